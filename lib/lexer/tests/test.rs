use std::rc::Rc;

use error_manager::ErrorManager;
use lexer::token::TokenKind;
use lexer::Lexer;
use span::SourceMap;

fn kinds(src: &str) -> (Vec<TokenKind>, usize) {
    let mut sources = SourceMap::default();
    let file = sources.add_file_anon(Rc::from(src));
    let mut em = ErrorManager::new();
    let tokens = Lexer::new(file).tokenize(&mut em);
    (tokens.iter().map(|t| t.kind).collect(), em.n_errors())
}

#[test]
fn punctuation() {
    use TokenKind::*;
    let (toks, errs) = kinds("a->b ++ -- += -= *= /= %= == != <= >= && || ...");
    assert_eq!(errs, 0);
    assert_eq!(
        toks,
        vec![
            Identifier, Arrow, Identifier, PlusPlus, MinusMinus, PlusEqual, MinusEqual,
            AsteriskEqual, SlashEqual, PercentEqual, EqualEqual, BangEqual, LessEqual,
            GreaterEqual, AmpAmp, PipePipe, Ellipsis, Eoi,
        ]
    );
}

#[test]
fn literals_by_radix() {
    use TokenKind::*;
    let (toks, errs) = kinds("42 0x2a 052 0 'x' \"hi\\n\"");
    assert_eq!(errs, 0);
    assert_eq!(
        toks,
        vec![
            DecimalLiteral,
            HexadecimalLiteral,
            OctalLiteral,
            DecimalLiteral,
            CharLiteral,
            StringLiteral,
            Eoi,
        ]
    );
}

#[test]
fn keywords_and_suffixes() {
    use TokenKind::*;
    let (toks, errs) = kinds("local x: u16 = 255u8;");
    assert_eq!(errs, 0);
    assert_eq!(
        toks,
        vec![Local, Identifier, Colon, U16, Equal, DecimalLiteral, U8, Semicolon, Eoi]
    );
}

#[test]
fn comments_are_skipped() {
    use TokenKind::*;
    let (toks, errs) = kinds("a // line\n/* block\n still */ b");
    assert_eq!(errs, 0);
    assert_eq!(toks, vec![Identifier, Identifier, Eoi]);
}

#[test]
fn bad_octal_digit() {
    let (_, errs) = kinds("09");
    assert_eq!(errs, 1);
}

#[test]
fn unterminated_string() {
    let (_, errs) = kinds("\"oops");
    assert_eq!(errs, 1);
}
