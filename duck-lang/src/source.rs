pub const STATEMENT_DELIMITER: char = ';';

/// Splits program text into statements. The delimiter is not protected
/// inside quoted literals, and empty statements are kept so that statement
/// indices stay stable for jumps.
pub fn split_statements(source: &str) -> Vec<&str> {
    source.split(STATEMENT_DELIMITER).collect()
}
