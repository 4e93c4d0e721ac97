//! Error macros for statgrade

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::GradeError::invalid_value($context, $value))
    };
}

/// Macro for rejecting a dataset row
#[macro_export]
macro_rules! bail_malformed {
    ($line:expr, $($arg:tt)*) => {
        return Err($crate::error::GradeError::malformed($line, format!($($arg)*)))
    };
}
