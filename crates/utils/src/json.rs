use std::{
    fs, io,
    path::Path,
};

use serde::Serialize;

/// Writes `value` as pretty JSON, creating missing parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_parent_directories() {
        let dir = std::env::temp_dir().join(format!("chainstat-json-{}", std::process::id()));
        let path = dir.join("nested").join("stats.json");

        write_json(&path, &serde_json::json!({"avg_txs_per_chunk": [1.5]})).unwrap();

        let written: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["avg_txs_per_chunk"][0], 1.5);

        fs::remove_dir_all(dir).unwrap();
    }
}
