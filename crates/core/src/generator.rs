//! Boundary to the external text-generation service.

use crate::error::Result;

/// Text in, text out. The returned text should contain one JSON document
/// but nothing downstream relies on it.
///
/// Timeouts and retries belong to the implementation; any error it returns
/// is treated as an upstream failure.
pub trait TextGenerator {
    fn generate(&self, instruction: &str) -> Result<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String>,
{
    fn generate(&self, instruction: &str) -> Result<String> {
        self(instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn call(generator: &dyn TextGenerator) -> Result<String> {
        generator.generate("instruction")
    }

    #[test]
    fn test_closure_generator() {
        let echo = |text: &str| -> Result<String> { Ok(text.to_uppercase()) };
        assert_eq!(call(&echo).unwrap(), "INSTRUCTION");

        let failing = |_: &str| -> Result<String> { Err(Error::Upstream("offline".into())) };
        assert!(call(&failing).is_err());
    }
}
