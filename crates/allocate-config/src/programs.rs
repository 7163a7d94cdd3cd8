//! Part program loading.
//!
//! A program file starts with a `part,process,machineGroup` header line; the
//! rest of the file is the program content. The program name is the file
//! stem.

use allocate_core::Program;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{ConfigError, ConfigResult};

/// Load programs from a directory (every regular file, by name) or a single file.
pub fn load_programs(path: &Path) -> ConfigResult<Vec<Program>> {
    let files = if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(path)
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut programs = Vec::with_capacity(files.len());
    for file in files {
        let text = std::fs::read_to_string(&file).map_err(|source| ConfigError::Read {
            path: file.display().to_string(),
            source,
        })?;
        let name = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| ConfigError::invalid("program file", file.display().to_string()))?;
        let program = parse_program(&name, &text)?;
        debug!(
            program = %program.name,
            part = %program.part,
            process = %program.process_number,
            "Loaded part program"
        );
        programs.push(program);
    }

    Ok(programs)
}

/// Parse the text of one program file.
pub fn parse_program(name: &str, text: &str) -> ConfigResult<Program> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| ConfigError::MissingField(format!("header line in program '{}'", name)))?;

    let fields: Vec<&str> = header.split(',').map(str::trim).collect();
    let [part, process, machine_group] = fields[..] else {
        return Err(ConfigError::invalid(
            format!("program '{}' header", name),
            format!("expected 'part,process,machineGroup', got '{}'", header),
        ));
    };
    if part.is_empty() {
        return Err(ConfigError::invalid(
            format!("program '{}' header", name),
            "empty part name",
        ));
    }

    Ok(Program {
        part: part.to_string(),
        process_number: process.to_string(),
        machine_group: machine_group.to_string(),
        name: name.to_string(),
        content: lines.collect::<Vec<_>>().join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_program() {
        let p = parse_program("aaa-1", "aaa,1,MC\nG0 X0\r\nM30\n").unwrap();
        assert_eq!(p.part, "aaa");
        assert_eq!(p.process_number, "1");
        assert_eq!(p.machine_group, "MC");
        assert_eq!(p.name, "aaa-1");
        assert_eq!(p.content, "G0 X0\nM30");
    }

    #[test]
    fn test_header_only() {
        let p = parse_program("empty", "bbb,2,MC").unwrap();
        assert_eq!(p.content, "");
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(
            parse_program("bad", "aaa,1\nM30").unwrap_err(),
            ConfigError::InvalidValue { .. }
        ));
        assert!(matches!(
            parse_program("none", "").unwrap_err(),
            ConfigError::MissingField(_)
        ));
    }

    #[test]
    fn test_load_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("zzz-1.nc"), "zzz,1,MC\nM30").unwrap();
        fs::write(dir.path().join("aaa-1.nc"), "aaa,1,MC\nM30").unwrap();
        fs::write(dir.path().join("aaa-2.nc"), "aaa,2,MC\nM30").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();

        let programs = load_programs(dir.path()).unwrap();
        let names: Vec<&str> = programs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["aaa-1", "aaa-2", "zzz-1"]);
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ccc-1.nc");
        fs::write(&path, "ccc,1,Lathe\nT1").unwrap();

        let programs = load_programs(&path).unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].machine_group, "Lathe");
    }

    #[test]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_programs(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
