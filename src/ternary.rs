/// My ternary expression handler.  Rust's ifs are already
/// expressions, but `cargo fmt` breaks them up line-by-line, and the
/// edge rules for neighbours, predecessors and skipped seam pixels
/// read much better as one-liners once this macro is understood.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}
