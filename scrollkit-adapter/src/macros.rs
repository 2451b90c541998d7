// Logging is a no-op unless the `tracing` feature is on. Fields are written in `tracing`
// syntax; every event goes to the `scrollkit_adapter` target.

#[cfg(feature = "tracing")]
macro_rules! slog {
    ($level:ident, $($tt:tt)*) => {
        tracing::$level!(target: "scrollkit_adapter", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! slog {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! strace {
    ($($tt:tt)*) => { slog!(trace, $($tt)*) };
}

macro_rules! sdebug {
    ($($tt:tt)*) => { slog!(debug, $($tt)*) };
}

macro_rules! swarn {
    ($($tt:tt)*) => { slog!(warn, $($tt)*) };
}
