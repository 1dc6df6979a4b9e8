//! Human-readable dumps of voter records.
//!
//! Records are written as indented JSON, one document per record, each
//! followed by a newline.

use std::io::Write;

use voter_types::VoterRecord;

use crate::error::StoreError;

/// Write one record as indented JSON followed by a newline.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the record cannot be written.
pub fn write_voter<W: Write>(out: &mut W, voter: &VoterRecord) -> Result<(), StoreError> {
    serde_json::to_writer_pretty(&mut *out, voter)?;
    out.write_all(b"\n").map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write every record in order with [`write_voter`].
///
/// # Errors
///
/// Returns the first error from [`write_voter`].
pub fn write_voters<W: Write>(out: &mut W, voters: &[VoterRecord]) -> Result<(), StoreError> {
    voters.iter().try_for_each(|voter| write_voter(out, voter))
}

/// Print one record to standard output.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the record cannot be written.
pub fn print_voter(voter: &VoterRecord) -> Result<(), StoreError> {
    write_voter(&mut std::io::stdout().lock(), voter)
}

/// Print every record to standard output.
///
/// # Errors
///
/// Returns the first error from [`write_voter`].
pub fn print_voters(voters: &[VoterRecord]) -> Result<(), StoreError> {
    write_voters(&mut std::io::stdout().lock(), voters)
}
