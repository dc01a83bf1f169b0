use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use dircache::{DirCache, RecordedDeps};

// cargo run -- . 'src/**/*.rs'
// DIRCACHE_TRACE=debug cargo run -- . '**/Cargo.toml'

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let Some(root) = args.next() else {
        eprintln!("usage: dircache <root> <pattern>...");
        return ExitCode::from(2);
    };
    let root = PathBuf::from(root);
    let deps = Arc::new(RecordedDeps::default());
    let cache = DirCache::builder().deps(deps.clone()).build();

    for pattern in args {
        let result = cache.glob(&root, &pattern, |path, is_dir| {
            let kind = if is_dir { 'd' } else { 'f' };
            println!("{kind} {}", path.display());
        });
        if let Err(err) = result {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
        // only directories first read by this pattern
        for dir in deps.take() {
            eprintln!("dep {}", dir.display());
        }
    }
    ExitCode::SUCCESS
}
