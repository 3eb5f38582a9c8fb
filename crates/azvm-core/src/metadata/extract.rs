//! Payload -> attribute set.
//!
//! Only the `compute` section is read. Its absence fails the whole extraction;
//! any individual field may be missing, in which case its attribute is left
//! out of the result.

use crate::error::ExtractError;

use super::attributes::{self, AttributeSet};
use super::payload::RawMetadata;

const COMPUTE: &str = "compute";

/// `compute.<field>` -> attribute name.
const FIELDS: [(&str, &str); 4] = [
    ("location", attributes::LOCATION),
    ("vmSize", attributes::SIZE),
    ("osType", attributes::OS),
    ("priority", attributes::PRIORITY),
];

pub fn extract(raw: &RawMetadata) -> Result<AttributeSet, ExtractError> {
    let compute = raw
        .section(COMPUTE)
        .ok_or(ExtractError::MalformedPayload("missing compute section"))?;

    let present = FIELDS
        .iter()
        .filter_map(|(field, attr)| compute.str_field(field).map(|v| (*attr, v.to_owned())));

    Ok(std::iter::once((attributes::SERVICE_NAME, attributes::SERVICE_NAME_VALUE.to_owned()))
        .chain(present)
        .collect())
}
