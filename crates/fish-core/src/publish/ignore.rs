//! Default ignore file for published projects

use crate::error::{FishError, FishResult};
use std::path::Path;

pub const IGNORE_FILE: &str = ".gitignore";

pub const DEFAULT_IGNORE: &str = "\
.DS_Store
node_modules
/dist

# local env files
.env.local
.env.*.local

# Log files
npm-debug.log*
yarn-debug.log*
yarn-error.log*
pnpm-debug.log*

# Editor directories and files
.idea
.vscode
*.suo
*.ntvs*
*.njsproj
*.sln
*.sw?
";

/// Write the default ignore file unless one exists. Returns true if written.
pub fn ensure_ignore_file(dir: &Path) -> FishResult<bool> {
    let path = dir.join(IGNORE_FILE);
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(&path, DEFAULT_IGNORE)
        .map_err(|e| FishError::io(format!("writing {}", path.display()), e))?;
    Ok(true)
}
