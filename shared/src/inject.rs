use std::fs;
use std::path::Path;

use crate::Error;

/// Environment variable name for a mounted secret file,
/// `db_password` becomes `DB_PASSWORD`.
pub fn var_name(file_name: &str) -> String {
    file_name.to_ascii_uppercase()
}

/// Export every regular file in `dir` as an environment variable, Docker
/// mounts secrets as one file per secret under `/run/secrets`.
///
/// Returns the names of the variables that were set, values stay out of
/// logs and return values.
pub fn inject_dir(dir: &Path) -> Result<Vec<String>, Error> {
    let read_err = |source| Error::SecretFile {
        path: dir.to_path_buf(),
        source,
    };

    let mut injected = Vec::new();

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();

        // secrets are plain files, anything else in there isn't ours
        if !path.is_file() {
            continue;
        }

        let name = var_name(&entry.file_name().to_string_lossy());
        let value = fs::read_to_string(&path).map_err(|source| Error::SecretFile {
            path: path.clone(),
            source,
        })?;

        std::env::set_var(&name, value.trim());
        injected.push(name);
    }

    injected.sort();
    Ok(injected)
}
