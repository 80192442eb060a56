//! Reference primitive library over `int`, `float` and `str`.
//!
//! Only signatures live here; executing the primitives is the renderer's job.

use crate::primitive::{PrimitiveRegistry, PrimitiveSpec};

/// Name of the integer type used by the reference catalog.
pub const INT: &str = "int";
/// Name of the floating point type used by the reference catalog.
pub const FLOAT: &str = "float";
/// Name of the string type used by the reference catalog.
pub const STR: &str = "str";

fn binary(name: &str, ty: &str) -> PrimitiveSpec {
    PrimitiveSpec::new(name).input("x", ty).input("y", ty).output(ty)
}

fn unary(name: &str, from: &str, to: &str) -> PrimitiveSpec {
    PrimitiveSpec::new(name).input("x", from).output(to)
}

/// Returns the reference arithmetic and string library.
pub fn standard() -> PrimitiveRegistry {
    PrimitiveRegistry::from_trusted(vec![
        binary("int_add", INT),
        binary("int_sub", INT),
        binary("int_mul", INT),
        binary("int_div", INT),
        binary("int_mod", INT),
        unary("int_neg", INT, INT),
        unary("to_float", INT, FLOAT),
        binary("float_add", FLOAT),
        binary("float_sub", FLOAT),
        binary("float_mul", FLOAT),
        binary("float_div", FLOAT),
        unary("float_abs", FLOAT, FLOAT),
        unary("float_neg", FLOAT, FLOAT),
        unary("float_sqrt", FLOAT, FLOAT),
        binary("float_pow", FLOAT),
        unary("trunc", FLOAT, INT),
        PrimitiveSpec::new("str_concat")
            .input("a", STR)
            .input("b", STR)
            .output(STR),
        PrimitiveSpec::new("str_upper").input("s", STR).output(STR),
        PrimitiveSpec::new("str_repeat")
            .input("s", STR)
            .input("n", INT)
            .output(STR),
        PrimitiveSpec::new("str_length").input("s", STR).output(INT),
        PrimitiveSpec::new("str_flip").input("s", STR).output(STR),
    ])
}
