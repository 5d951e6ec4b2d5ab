//! I/O utilities for VPLink.
//!
//! Input readers for the command line, along with Unicode helpers used by
//! the chunker.

pub mod reader;
pub mod unicode;

pub use reader::{read_input, read_stdin, read_text, text_or_stdin};
pub use unicode::find_char_boundary;
