use compiler_driver::Compiler;

fn compile(src: &str) -> Option<String> {
    Compiler::from_string(src).process()
}

fn compile_ok(src: &str) -> String {
    compile(src).expect("translation failed")
}

#[test]
fn pointer_plus_integer_uses_ptr_inc() {
    let ir = compile_ok("fn f(p: -> i32): -> i32 { return p + 3; }");
    assert!(ir.contains("ptr_inc(i32"), "{ir}");
}

#[test]
fn pointer_difference_uses_ptr_diff() {
    let ir = compile_ok("fn f(p: -> i32, q: -> i32): i64 { return p - q; }");
    assert!(ir.contains("ptr_diff(i32"), "{ir}");
}

#[test]
fn array_decays_to_pointer() {
    let ir = compile_ok(
        "fn f(): -> i16 {
            local a: array[8] of i16;
            return a + 1;
        }",
    );
    assert!(ir.contains("ptr_inc(i16"), "{ir}");
}

#[test]
fn short_circuit_and_branches_through_check_label() {
    let ir = compile_ok(
        "fn f(a: i32, b: i32): i32 {
            if (a && b) {
                return 1;
            }
            return 0;
        }",
    );
    assert!(ir.contains("chkRight"), "{ir}");
    /* the false edge of the left operand jumps straight to else */
    let first_branch = ir.lines().find(|l| l.contains("br %")).unwrap();
    assert!(first_branch.contains("chkRight"), "{first_branch}");
    assert!(first_branch.contains("else"), "{first_branch}");
}

#[test]
fn logical_value_materializes_via_phi() {
    let ir = compile_ok("fn f(a: i32, b: i32): bool { return a && b; }");
    assert!(ir.contains("phi i1"), "{ir}");
}

#[test]
fn conditional_expression_joins_with_phi() {
    let ir = compile_ok("fn max(a: i64, b: i64): i64 { return a > b ? a : b; }");
    assert!(ir.contains("phi i64"), "{ir}");
    assert!(ir.contains("cmp sgt"), "{ir}");
}

#[test]
fn null_pointer_initializer_stores_null() {
    let ir = compile_ok("fn f() { local p: -> i32 = nullptr; }");
    assert!(ir.contains("zero ptr"), "{ir}");
    assert!(ir.contains("store ptr"), "{ir}");
}

#[test]
fn member_access_uses_ptr_member() {
    let ir = compile_ok(
        "struct pair { first: i32; second: i64; };
        fn f(): i64 {
            local p: pair;
            p.second = 9;
            return p.second;
        }",
    );
    assert!(ir.contains("ptr_member(struct pair"), "{ir}");
    assert!(ir.contains(", 1)"), "{ir}");
}

#[test]
fn while_loop_label_structure() {
    let ir = compile_ok(
        "fn f(): i32 {
            local n: i32 = 0;
            while (n < 10) {
                n = n + 1;
            }
            return n;
        }",
    );
    assert!(ir.contains("cond."), "{ir}");
    assert!(ir.contains("loop."), "{ir}");
    assert!(ir.contains("end."), "{ir}");
}

#[test]
fn unsigned_and_signed_division_lower_differently() {
    let signed = compile_ok("fn f(a: i32, b: i32): i32 { return a / b; }");
    assert!(signed.contains("sdiv"), "{signed}");

    let unsigned = compile_ok("fn f(a: u32, b: u32): u32 { return a / b; }");
    assert!(unsigned.contains("udiv"), "{unsigned}");
}

#[test]
fn global_aggregate_initializer() {
    let ir = compile_ok("local table: array[3] of i32 = { 1, 2, 3 };");
    assert!(ir.contains("@table"), "{ir}");
    assert!(ir.contains("[i32 1, i32 2, i32 3]"), "{ir}");
}

#[test]
fn global_scalar_and_string() {
    let ir = compile_ok(
        "local answer: u16 = 0x2a;
        local greeting: -> u8 = \"hi\";",
    );
    assert!(ir.contains("@answer"), "{ir}");
    assert!(ir.contains("i16 42"), "{ir}");
    assert!(ir.contains("@greeting"), "{ir}");
    assert!(ir.contains("\"hi\""), "{ir}");
}

#[test]
fn varg_call_lowers_all_arguments() {
    let ir = compile_ok(
        "fn log(level: i32, ...): void;
        fn f() {
            local buf: array[4] of u8;
            log(1, buf, 7);
        }",
    );
    assert!(ir.contains("call @log"), "{ir}");
}

#[test]
fn errors_stop_translation() {
    assert!(compile("fn main() { local c: const i32 = 1; c = 5; }").is_none());
    assert!(compile("fn f(x: i32): i32 { return x; } fn main() { f(); }").is_none());
    assert!(compile("fn main() { undefined = 3; }").is_none());
}
