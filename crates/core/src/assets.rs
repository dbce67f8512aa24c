use once_cell::sync::Lazy;
use std::path::PathBuf;

static DEFAULT_DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    home::home_dir()
        .map(|p| p.join(".local/share/ez"))
        .unwrap_or_else(|| PathBuf::from("~/.local/share/ez"))
});

/// Path of the persisted config file, a dotenv-style file in the user's home
/// directory.
pub fn get_config_file() -> PathBuf {
    home::home_dir()
        .map(|p| p.join(".ez"))
        .unwrap_or_else(|| PathBuf::from("~/.ez"))
}

pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data_home).join("ez")
    } else {
        DEFAULT_DATA_DIR.clone()
    };
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify the environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_get_config_file_is_in_home() {
        let config_file = get_config_file();
        assert_eq!(config_file.file_name().unwrap(), ".ez");
    }

    #[test]
    fn test_get_data_dir_with_xdg_set() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let tmp_dir = tempfile::tempdir().unwrap();
        let xdg_data_path = tmp_dir.path();
        unsafe {
            env::set_var("XDG_DATA_HOME", xdg_data_path);
        }

        let data_dir = get_data_dir().unwrap();
        assert_eq!(data_dir, xdg_data_path.join("ez"));

        unsafe {
            env::remove_var("XDG_DATA_HOME");
        }
    }
}
