// Info level logs that only exist in debug builds.
//
// Raising the log crate's static max level to debug would also enable the debug logs
// of every dependency, which slows debug builds down considerably.

#[macro_export]
macro_rules! i_debug {
    ($($arg:tt)+) => {
        if cfg!(debug_assertions) {
            log::info!($($arg)+);
        }
    };
}
