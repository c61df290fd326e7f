use rand::Rng;

use crate::domain::entities::{CODE_MAX, CODE_MIN};
use crate::ports::outbound::CodeGenerator;

/// Uniform six-digit codes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> u32 {
        rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX)
    }
}
