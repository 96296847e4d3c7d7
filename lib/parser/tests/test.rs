use std::rc::Rc;

use ast::Ast;
use error_manager::ErrorManager;
use lexer::Lexer;
use semantic::TypeCtx;
use span::SourceMap;

fn find_errors(src: &str) -> usize {
    let mut sources = SourceMap::default();
    let file = sources.add_file_anon(Rc::from(src));

    let mut em = ErrorManager::new();
    let tokens = Lexer::new(file).tokenize(&mut em);
    /* the lexer phase is tested on its own */
    assert_eq!(em.n_errors(), 0, "lex error in test input");

    let ast = Ast::default();
    let tcx = TypeCtx::default();
    parser::parse(&tokens, &file.contents, &ast, &tcx, &mut em);
    em.n_errors()
}

#[test]
fn valid() {
    const INPUT: &str = r#"
struct node {
    value: i64;
    next: -> node;
};

type word = u32;

enum color: u8 { red, green = 3, blue, };

fn sum(items: -> i64, count: u64): i64 {
    local total: i64 = 0;
    for (local i: u64 = 0; i < count; ++i) {
        total += items[i];
    }
    return total;
}

fn main(): i32 {
    local buf: array[4] of i64 = { 1, 2, 3, 4 };
    local head: node;
    head.value = sum(buf, 4u64);
    head.next = nullptr;

    local w: word = 12;
    if (w > 3 && head.value != 0) {
        w = w * 2;
    } else {
        while (w < 100) {
            w = w + 1;
        }
    }
    return (i32) head.value;
}
"#;

    assert_eq!(find_errors(INPUT), 0);
}

#[test]
fn expected_token() {
    assert_eq!(find_errors("fn main() { local a: i32 = 1 }"), 1);
    assert_eq!(find_errors("fn main( { }"), 1);
}

#[test]
fn undefined_identifier() {
    assert_eq!(find_errors("fn main() { x = 1; }"), 1);
}

#[test]
fn assignment_to_readonly() {
    const INPUT: &str = "
fn main() {
    local c: const i32 = 1;
    c = 5;
}
";
    assert_eq!(find_errors(INPUT), 1);
}

#[test]
fn call_arity() {
    const TOO_FEW: &str = "
fn f(x: i32): i32 { return x; }
fn main() { f(); }
";
    const TOO_MANY: &str = "
fn f(x: i32): i32 { return x; }
fn main() { f(1, 2); }
";
    assert_eq!(find_errors(TOO_FEW), 1);
    assert_eq!(find_errors(TOO_MANY), 1);
}

#[test]
fn operator_type_mismatch() {
    const INPUT: &str = "
struct point { x: i32; };
fn main() {
    local p: point;
    p + 1;
}
";
    assert_eq!(find_errors(INPUT), 1);
}

#[test]
fn struct_redefinition() {
    const INPUT: &str = "
struct point { x: i32; };
struct point { y: i32; };
";
    assert_eq!(find_errors(INPUT), 1);
}

#[test]
fn function_signature_conflict() {
    const INPUT: &str = "
fn f(x: i32): i32;
fn f(x: u8): i32 { return 0; }
";
    assert_eq!(find_errors(INPUT), 1);
}

#[test]
fn recursive_struct_through_pointer() {
    const INPUT: &str = "
struct list {
    head: -> list;
    len: u64;
};
fn main() {
    local l: list;
    l.head = nullptr;
    l.head;
}
";
    assert_eq!(find_errors(INPUT), 0);
}

#[test]
fn unbound_array_is_patched_by_initializer() {
    const INPUT: &str = "
fn main() {
    local a: array[] of i32 = { 1, 2, 3 };
    a[2] = 5;
}
";
    assert_eq!(find_errors(INPUT), 0);
}

#[test]
fn dereferencing_nullptr() {
    assert_eq!(find_errors("fn main() { *nullptr; }"), 1);
}

#[test]
fn shadowing_between_scopes() {
    const INPUT: &str = "
fn main() {
    local x: i32 = 1;
    {
        local x: -> i32 = &x;
        **&x;
    }
    x = 2;
}
";
    assert_eq!(find_errors(INPUT), 0);
}
