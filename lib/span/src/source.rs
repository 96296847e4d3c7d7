use std::path::PathBuf;
use std::rc::Rc;

use crate::{FilePosition, Span};

pub enum FileName {
    Path(PathBuf),
    Stdin,
    Anon,
}

impl<T: Into<PathBuf>> From<T> for FileName {
    fn from(value: T) -> Self {
        FileName::Path(value.into())
    }
}

pub struct SourceFile {
    pub fname: FileName,
    pub contents: Rc<str>,
    pub id: u32,
}

impl SourceFile {
    pub fn filename(&self) -> &str {
        match &self.fname {
            FileName::Path(path) => path.to_str().unwrap_or("<non-utf8 path>"),
            FileName::Stdin => "<stdin>",
            FileName::Anon => "<anon>",
        }
    }
}

#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn add_file(&mut self, fname: FileName, contents: Rc<str>) -> &SourceFile {
        #[allow(clippy::cast_possible_truncation)]
        let id = self.files.len() as u32;
        self.files.push(SourceFile { fname, contents, id });
        self.files.last().unwrap()
    }

    #[inline]
    pub fn add_file_anon(&mut self, contents: Rc<str>) -> &SourceFile {
        self.add_file(FileName::Anon, contents)
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&SourceFile> {
        self.files.get(id as usize)
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn slice(&self, span: Span) -> &str {
        let src = &self.get(span.fileid).unwrap().contents;
        span.slice(src)
    }

    pub fn file_position(&self, span: Span) -> FilePosition {
        self.get(span.fileid)
            .map(|file| span.file_position(&file.contents))
            .unwrap_or_default()
    }
}
