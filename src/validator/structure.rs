use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use crate::mat::{read_variables, MatValue};
use crate::movie_info::{MOVIE_INFO_FIELDS, MOVIE_INFO_VARIABLE};

use super::{ValidationCheck, ValidationError, ValidationReport};

/// Step 1: file, variable and struct layout.
///
/// Returns the `movieInfo` value when it is a struct array worth checking
/// frame by frame.
pub(crate) fn check_structure(
    path: &Path,
    report: &mut ValidationReport,
) -> Result<Option<MatValue>, ValidationError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            report.add_check(ValidationCheck::failed(
                "File exists",
                format!("File does not exist: {}", path.display()),
            ));
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    report.add_check(ValidationCheck::ok("File exists"));

    let variables = match read_variables(BufReader::new(file)) {
        Ok(variables) => variables,
        Err(e) => {
            report.add_check(ValidationCheck::failed("Level 5 MAT-file", e.to_string()));
            return Ok(None);
        }
    };
    report.add_check(ValidationCheck::ok("Level 5 MAT-file"));

    let Some(variable) = variables.into_iter().find(|v| v.name == MOVIE_INFO_VARIABLE) else {
        report.add_check(ValidationCheck::failed(
            "movieInfo variable present",
            "No variable named movieInfo",
        ));
        return Ok(None);
    };
    report.add_check(ValidationCheck::ok("movieInfo variable present"));

    let value = variable.value;
    let MatValue::Struct { dims, fields, .. } = &value else {
        report.add_check(ValidationCheck::failed(
            "movieInfo is a struct array",
            "movieInfo is a numeric matrix",
        ));
        return Ok(None);
    };
    report.add_check(ValidationCheck::ok("movieInfo is a struct array"));

    let missing: Vec<&str> = MOVIE_INFO_FIELDS
        .iter()
        .copied()
        .filter(|required| !fields.iter().any(|f| f == required))
        .collect();
    if missing.is_empty() {
        report.add_check(ValidationCheck::ok("Fields xCoord, yCoord, amp"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Fields xCoord, yCoord, amp",
            format!("Missing fields: {}", missing.join(", ")),
        ));
        return Ok(None);
    }

    match dims.as_slice() {
        [_, 1] => report.add_check(ValidationCheck::ok("Shape (frames x 1)")),
        [1, n] => report.add_check(ValidationCheck::warning(
            "Shape (frames x 1)",
            format!("Stored as a 1 x {} row", n),
        )),
        other => report.add_check(ValidationCheck::failed(
            "Shape (frames x 1)",
            format!("Unexpected dimensions {:?}", other),
        )),
    }

    Ok(Some(value))
}
