//! Patient-identifier stripping for audit inputs.

use medcalc_contracts::params::Parameters;

/// Keys removed before a parameter bag reaches the audit log.
pub const IDENTIFIER_KEYS: [&str; 11] = [
    "patientName",
    "patientId",
    "name",
    "mrn",
    "medicalRecordNumber",
    "dob",
    "dateOfBirth",
    "ssn",
    "address",
    "phone",
    "email",
];

/// True if `key` names a patient identifier, ignoring ASCII case.
pub fn is_identifier(key: &str) -> bool {
    IDENTIFIER_KEYS.iter().any(|id| id.eq_ignore_ascii_case(key))
}

/// Copy of `params` with every identifier key removed.
pub fn sanitize(params: &Parameters) -> Parameters {
    let mut clean = params.clone();
    clean.retain(|key| !is_identifier(key));
    clean
}
