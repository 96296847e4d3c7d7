use std::path::PathBuf;
use std::{env, fs, process};

mod config;
use compiler_driver::Compiler;
use config::Config;

fn main() {
    let conf = Config::parse(env::args());

    if conf.files.is_empty() {
        let comp = Compiler::from_stdin().unwrap_or_else(|err| {
            eprintln!("error reading stdin: {err}");
            process::exit(1);
        });
        run(&comp, &conf, None);
        return;
    }

    for file in &conf.files {
        let comp = Compiler::from_filename(file).unwrap_or_else(|err| {
            eprintln!("error reading \"{file}\": {err}");
            process::exit(1);
        });
        run(&comp, &conf, Some(file.as_str()));
    }
}

fn run(comp: &Compiler, conf: &Config, fname: Option<&str>) {
    if conf.check {
        if comp.check().is_none() {
            process::exit(1);
        }
        return;
    }

    let Some(ir_text) = comp.process() else {
        process::exit(1);
    };

    let out = conf.out_file.clone().or_else(|| {
        fname.map(|f| {
            let mut path = PathBuf::from(f);
            path.set_extension("ir");
            path.display().to_string()
        })
    });

    match out {
        Some(path) => {
            fs::write(&path, ir_text).unwrap_or_else(|err| {
                eprintln!("error writing \"{path}\": {err}");
                process::exit(1);
            });
            println!("IR written to {path}");
        }
        None => print!("{ir_text}"),
    }
}
