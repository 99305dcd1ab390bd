use crate::{DeclRef, Idx, Pool, Quals, RecordNames};
use pretty_assertions::assert_eq;

struct Names;

impl RecordNames for Names {
    fn decl_name(&self, decl: DeclRef) -> String {
        match decl.0 {
            0 => "S".to_owned(),
            _ => format!("ns::E{}", decl.0),
        }
    }
}

fn spell(pool: &Pool, ty: Idx) -> String {
    pool.format_type(ty, &Names)
}

#[test]
fn fundamentals() {
    let pool = Pool::new();
    assert_eq!(spell(&pool, Idx::ULLONG), "unsigned long long");
    assert_eq!(spell(&pool, Idx::INFO), "std::meta::info");
}

#[test]
fn pointers_and_cv() {
    let mut pool = Pool::new();
    let ci = pool.const_of(Idx::INT);
    let p_ci = pool.pointer(ci);
    let p = pool.pointer(Idx::INT);
    let cp = pool.const_of(p);
    let cp_ci = pool.const_of(p_ci);
    let pp = pool.pointer(cp_ci);

    assert_eq!(spell(&pool, p_ci), "const int*");
    assert_eq!(spell(&pool, cp), "int* const");
    assert_eq!(spell(&pool, pp), "const int* const*");
    let v = pool.qualified(Idx::CHAR, Quals::CONST | Quals::VOLATILE);
    assert_eq!(spell(&pool, v), "const volatile char");
}

#[test]
fn references() {
    let mut pool = Pool::new();
    let l = pool.lvalue_ref(Idx::INT);
    let r = pool.rvalue_ref(Idx::DOUBLE);
    assert_eq!(spell(&pool, l), "int&");
    assert_eq!(spell(&pool, r), "double&&");
}

#[test]
fn arrays_and_functions() {
    let mut pool = Pool::new();
    let arr = pool.array(Idx::INT, Some(5));
    let p_arr = pool.pointer(arr);
    let unbounded = pool.array(Idx::CHAR, None);
    let f = pool.function(&[Idx::INT, Idx::CHAR], Idx::VOID, false);
    let pf = pool.pointer(f);
    let variadic = pool.function(&[Idx::INT], Idx::INT, true);

    assert_eq!(spell(&pool, arr), "int[5]");
    assert_eq!(spell(&pool, p_arr), "int(*)[5]");
    assert_eq!(spell(&pool, unbounded), "char[]");
    assert_eq!(spell(&pool, f), "void(int, char)");
    assert_eq!(spell(&pool, pf), "void(*)(int, char)");
    assert_eq!(spell(&pool, variadic), "int(int, ...)");
}

#[test]
fn declared_types_and_member_pointers() {
    let mut pool = Pool::new();
    let s = pool.record(DeclRef(0));
    let e = pool.enumeration(DeclRef(3));
    let pmd = pool.member_pointer(s, Idx::INT);
    let cs = pool.const_of(s);

    assert_eq!(spell(&pool, e), "ns::E3");
    assert_eq!(spell(&pool, pmd), "int S::*");
    assert_eq!(spell(&pool, cs), "const S");
}
