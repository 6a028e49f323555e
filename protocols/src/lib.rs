//! Wire protocols spoken by the scanner.

pub mod z21;
