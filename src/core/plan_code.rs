//! Human-shareable plan identifiers of the form `SAVE-XXXX`.

use rand::{seq::SliceRandom, thread_rng};

pub const PLAN_CODE_PREFIX: &str = "SAVE-";
pub const PLAN_CODE_SUFFIX_LEN: usize = 4;
/// Uppercase letters and digits without the look-alikes `I`, `O`, `0` and `1`.
pub const PLAN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Produces candidate plan codes. Uniqueness is enforced by the caller and the store.
pub trait PlanCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws each suffix character uniformly from [`PLAN_CODE_ALPHABET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPlanCodes;

impl PlanCodeGenerator for RandomPlanCodes {
    fn generate(&self) -> String {
        let mut rng = thread_rng();
        let mut code = String::with_capacity(PLAN_CODE_PREFIX.len() + PLAN_CODE_SUFFIX_LEN);
        code.push_str(PLAN_CODE_PREFIX);
        for _ in 0..PLAN_CODE_SUFFIX_LEN {
            if let Some(byte) = PLAN_CODE_ALPHABET.choose(&mut rng) {
                code.push(char::from(*byte));
            }
        }
        code
    }
}

/// Checks the `SAVE-` prefix and a four character suffix drawn from the alphabet.
pub fn is_valid_plan_code(code: &str) -> bool {
    match code.strip_prefix(PLAN_CODE_PREFIX) {
        Some(suffix) => {
            suffix.len() == PLAN_CODE_SUFFIX_LEN
                && suffix.bytes().all(|b| PLAN_CODE_ALPHABET.contains(&b))
        }
        None => false,
    }
}
