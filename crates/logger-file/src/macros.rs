//! Formatting macros, one per severity: `info!(logger, "x = {}", x)`

/// Format and log through [`FileLogger::emerg`](crate::FileLogger::emerg)
#[macro_export]
macro_rules! emerg {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emerg(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::alert`](crate::FileLogger::alert)
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $logger.alert(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::crit`](crate::FileLogger::crit)
#[macro_export]
macro_rules! crit {
    ($logger:expr, $($arg:tt)+) => {
        $logger.crit(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::err`](crate::FileLogger::err)
#[macro_export]
macro_rules! err {
    ($logger:expr, $($arg:tt)+) => {
        $logger.err(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::warning`](crate::FileLogger::warning)
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warning(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::notice`](crate::FileLogger::notice)
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $logger.notice(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::info`](crate::FileLogger::info)
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Format and log through [`FileLogger::debug`](crate::FileLogger::debug)
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}
