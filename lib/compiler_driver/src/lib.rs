//! The front-end pipeline: source text to IR text.
//!
//! Each phase runs to completion and dumps its diagnostics; the
//! first phase with errors stops the translation.

use std::io::{self, stderr, stdin, Read};
use std::path::Path;
use std::rc::Rc;

use ast::Ast;
use error_manager::ErrorManager;
use lexer::Lexer;
use semantic::TypeCtx;
use span::{FileName, SourceMap};

pub struct Compiler {
    sources: SourceMap,
}

fn step_emit(sources: &SourceMap, em: &ErrorManager) -> Option<()> {
    em.print_warnings(sources, &mut stderr().lock()).unwrap();

    if em.has_errors() {
        em.print_errors(sources, &mut stderr().lock()).unwrap();
        None
    } else {
        Some(())
    }
}

impl Compiler {
    pub fn from_filename<P: AsRef<Path>>(fname: P) -> io::Result<Self> {
        let contents = std::fs::read_to_string(&fname)?;
        let mut sources = SourceMap::default();
        sources.add_file(FileName::from(fname.as_ref()), Rc::from(contents));
        Ok(Self { sources })
    }

    pub fn from_stdin() -> io::Result<Self> {
        let mut contents = String::new();
        stdin().read_to_string(&mut contents)?;
        let mut sources = SourceMap::default();
        sources.add_file(FileName::Stdin, Rc::from(contents));
        Ok(Self { sources })
    }

    pub fn from_string(src: &str) -> Self {
        let mut sources = SourceMap::default();
        sources.add_file_anon(Rc::from(src));
        Self { sources }
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Runs the whole front-end. `Some` holds the rendered IR;
    /// `None` means diagnostics were printed and the translation
    /// failed.
    pub fn process(&self) -> Option<String> {
        let file = self.sources.get(0).unwrap();

        let mut em = ErrorManager::new();
        let tokens = Lexer::new(file).tokenize(&mut em);
        step_emit(&self.sources, &em)?;

        let ast = Ast::default();
        let tcx = TypeCtx::default();
        let unit = parser::parse(&tokens, &file.contents, &ast, &tcx, &mut em);
        step_emit(&self.sources, &em)?;
        let unit = unit.unwrap();

        let module = codegen::lower(&unit, &tcx, &mut em);
        step_emit(&self.sources, &em)?;

        Some(module.to_string())
    }

    /// Parses and type-checks without generating code.
    pub fn check(&self) -> Option<()> {
        let file = self.sources.get(0).unwrap();

        let mut em = ErrorManager::new();
        let tokens = Lexer::new(file).tokenize(&mut em);
        step_emit(&self.sources, &em)?;

        let ast = Ast::default();
        let tcx = TypeCtx::default();
        let unit = parser::parse(&tokens, &file.contents, &ast, &tcx, &mut em);
        step_emit(&self.sources, &em)?;
        unit.map(|_| ())
    }
}
