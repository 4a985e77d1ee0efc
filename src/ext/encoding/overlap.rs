//! Pairwise encoding-space collision detection.
//!
//! The encoding oracle assigns each line its bits independently and misses
//! some cross-instruction conflicts, so every accepted record is re-checked
//! here against all others before the batch is released.

use super::super::error::ExtError;
use super::super::instruction::Instruction;
use super::super::model::Format;

/// Fails with an opcode error naming both instructions if `candidate` and
/// any differently-named record in `accepted` can decode the same word.
pub(crate) fn check_no_overlap(
    candidate: &Instruction,
    accepted: &[Instruction],
) -> Result<(), ExtError> {
    for other in accepted {
        if other.name() == candidate.name() {
            continue;
        }
        let collides = match other.format() {
            // An R-type's match is fully specified over its mask bits: if
            // the candidate's mask selects bits that already equal the
            // other's required pattern, any word matching the candidate
            // matches the other too.
            Format::R => other.match_value() & candidate.mask_value() == candidate.match_value(),
            // Symmetric intersection: restrict both matches to the bits
            // both masks cover and see whether they agree there.
            Format::I => {
                other.match_value() & candidate.mask_value()
                    == candidate.match_value() & other.mask_value()
            }
        };
        if collides {
            return Err(ExtError::Opcode(format!(
                "{} and {} overlap",
                candidate.name(),
                other.name()
            )));
        }
    }
    Ok(())
}
