pub mod bigint_decimal;
pub mod int;
pub mod random;
pub mod slice;
