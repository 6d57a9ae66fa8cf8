//! Arbor - a program-analysis toolkit
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use arbor_ast as ast;

#[cfg(test)]
mod tests {
    #[test]
    fn workspace_compiles() {
        // Ensure the workspace compiles
        assert!(true);
    }
}
