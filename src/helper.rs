// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::write;

use tempfile::tempdir;

use crate::config::CONFIG_FILE;
use crate::error::Fallible;

/// Create an empty directory that outlives the function. Tests use it as a
/// data directory.
pub fn create_tmp_directory() -> Fallible<String> {
    let target = tempdir()?.keep().canonicalize()?;
    Ok(target.display().to_string())
}

/// Create a data directory whose config file has the given contents.
pub fn create_tmp_directory_with_config(config: &str) -> Fallible<String> {
    let directory = create_tmp_directory()?;
    write(std::path::Path::new(&directory).join(CONFIG_FILE), config)?;
    Ok(directory)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_create_tmp_directory() -> Fallible<()> {
        let directory = PathBuf::from(create_tmp_directory()?);
        assert!(directory.exists());
        assert_eq!(directory.read_dir()?.count(), 0);
        Ok(())
    }

    #[test]
    fn test_create_tmp_directory_with_config() -> Fallible<()> {
        let directory = PathBuf::from(create_tmp_directory_with_config("[study]\n")?);
        assert!(directory.join(CONFIG_FILE).exists());
        Ok(())
    }
}
