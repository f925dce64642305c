//! Platform archive builders.

use super::tools::ToolRunner;
use super::{Platform, ReleaseError};
use crate::config::ReleaseConfig;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// `upx` exit code for a binary that is already compressed.
const UPX_ALREADY_PACKED: i32 = 2;

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ReleaseError + '_ {
    move |source| ReleaseError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Run a tool in `cwd`, failing on any non-zero exit.
fn run_checked(
    tools: &dyn ToolRunner,
    program: &str,
    args: &[String],
    cwd: &Path,
) -> Result<(), ReleaseError> {
    let status = tools
        .run(program, args, cwd)
        .map_err(|source| ReleaseError::Spawn {
            program: program.to_string(),
            source,
        })?;
    match status {
        0 => Ok(()),
        UPX_ALREADY_PACKED if program == "upx" => {
            Err(ReleaseError::AlreadyPacked(PathBuf::from(&args[0])))
        }
        status => Err(ReleaseError::ToolFailed {
            program: program.to_string(),
            status,
        }),
    }
}

/// Stage READMEs and binary under `<versions>/<Display>_<ver>/`, pack the
/// binary, and zip the staging directory.
pub fn windows(
    root: &Path,
    config: &ReleaseConfig,
    version: &str,
    binary: &Path,
    tools: &dyn ToolRunner,
) -> Result<PathBuf, ReleaseError> {
    let versions_dir = root.join(&config.versions_dir);
    let staging_name = format!("{}_{}", config.display_name, version);
    let staging = versions_dir.join(&staging_name);
    if staging.exists() {
        fs::remove_dir_all(&staging).map_err(io_err(&staging))?;
    }
    fs::create_dir_all(&staging).map_err(io_err(&staging))?;

    let readme_dir = root.join(&config.readme_dir);
    for readme in Platform::Windows.readmes(config) {
        let source = readme_dir.join(readme);
        let text = fs::read_to_string(&source).map_err(io_err(&source))?;
        let target = staging.join(format!("{readme}.txt"));
        fs::write(&target, to_crlf(&text)).map_err(io_err(&target))?;
    }

    let packed = staging.join(format!("{}_{}_win32.exe", config.program_name, version));
    let source = root.join(binary);
    fs::copy(&source, &packed).map_err(io_err(&source))?;
    run_checked(tools, "upx", &[packed.to_string_lossy().to_string()], root)?;

    let archive = versions_dir.join(format!("{}_{}_win32.zip", config.program_name, version));
    zip_directory(&staging, &staging_name, &archive)?;
    Ok(archive)
}

/// Patch the interpreter, pack the binary, and tar it with the READMEs
/// under a `<program>_<ver>/` prefix. The archive lands in the versions
/// directory, replacing any previous one.
pub fn linux(
    root: &Path,
    config: &ReleaseConfig,
    version: &str,
    binary: &Path,
    tools: &dyn ToolRunner,
) -> Result<PathBuf, ReleaseError> {
    let binary_arg = binary.to_string_lossy().to_string();
    run_checked(
        tools,
        "patchelf",
        &[
            "--set-interpreter".to_string(),
            config.interpreter.clone(),
            binary_arg.clone(),
        ],
        root,
    )?;
    run_checked(tools, "upx", &[binary_arg.clone()], root)?;

    let archive_name = format!("{}_{}_linux32.tar.gz", config.program_name, version);
    let mut args = vec![
        "czf".to_string(),
        archive_name.clone(),
        format!("--transform=s@^@{}_{}/@", config.program_name, version),
        binary_arg,
        "-C".to_string(),
        config.readme_dir.clone(),
    ];
    args.extend(Platform::Linux.readmes(config).iter().cloned());
    run_checked(tools, "tar", &args, root)?;

    let built = root.join(&archive_name);
    let versions_dir = root.join(&config.versions_dir);
    fs::create_dir_all(&versions_dir).map_err(io_err(&versions_dir))?;
    let archive = versions_dir.join(&archive_name);
    fs::copy(&built, &archive).map_err(io_err(&built))?;
    fs::remove_file(&built).map_err(io_err(&built))?;
    Ok(archive)
}

/// `\n` line endings to `\r\n`, leaving existing `\r\n` alone.
fn to_crlf(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

/// Zip every file under `dir` as `<prefix>/<relative path>`, replacing
/// `archive` if it exists.
fn zip_directory(dir: &Path, prefix: &str, archive: &Path) -> Result<(), ReleaseError> {
    let file = File::create(archive).map_err(io_err(archive))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o755);

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .fold(prefix.to_string(), |acc, part| format!("{acc}/{part}"));

        zip.start_file(name, options)?;
        let mut input = File::open(entry.path()).map_err(io_err(entry.path()))?;
        io::copy(&mut input, &mut zip).map_err(io_err(archive))?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_project;
    use super::super::tools::tests::MockTools;
    use super::*;
    use std::io::Read;

    fn windows_config() -> ReleaseConfig {
        ReleaseConfig {
            windows_readmes: vec!["README".to_string()],
            ..ReleaseConfig::default()
        }
    }

    #[test]
    fn crlf_conversion_is_idempotent() {
        assert_eq!(to_crlf("a\nb\n"), "a\r\nb\r\n");
        assert_eq!(to_crlf("a\r\nb\n"), "a\r\nb\r\n");
    }

    #[test]
    fn windows_zip_holds_prefixed_entries() {
        let tmp = setup_project("cstitch.exe");
        let tools = MockTools::new();

        let archive = windows(
            tmp.path(),
            &windows_config(),
            "0.9.4",
            Path::new("cstitch.exe"),
            &tools,
        )
        .unwrap();

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "Cstitch_0.9.4/README.txt",
                "Cstitch_0.9.4/cstitch_0.9.4_win32.exe"
            ]
        );

        let mut readme = String::new();
        zip.by_name("Cstitch_0.9.4/README.txt")
            .unwrap()
            .read_to_string(&mut readme)
            .unwrap();
        assert_eq!(readme, "read\r\nme\r\n");
    }

    #[test]
    fn windows_packs_staged_copy_not_original() {
        let tmp = setup_project("cstitch.exe");
        let tools = MockTools::new();

        windows(
            tmp.path(),
            &windows_config(),
            "0.9.4",
            Path::new("cstitch.exe"),
            &tools,
        )
        .unwrap();

        let calls = tools.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].args[0].ends_with("versions/Cstitch_0.9.4/cstitch_0.9.4_win32.exe"));
    }

    #[test]
    fn windows_restages_from_scratch() {
        let tmp = setup_project("cstitch.exe");
        let stale = tmp.path().join("versions/Cstitch_0.9.4/stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        windows(
            tmp.path(),
            &windows_config(),
            "0.9.4",
            Path::new("cstitch.exe"),
            &MockTools::new(),
        )
        .unwrap();

        assert!(!stale.exists());
    }

    #[test]
    fn windows_already_packed_is_error() {
        let tmp = setup_project("cstitch.exe");
        let tools = MockTools::with_exit_code("upx", 2);

        let result = windows(
            tmp.path(),
            &windows_config(),
            "0.9.4",
            Path::new("cstitch.exe"),
            &tools,
        );

        assert!(matches!(result, Err(ReleaseError::AlreadyPacked(_))));
        assert!(!tmp.path().join("versions/cstitch_0.9.4_win32.zip").exists());
    }

    #[test]
    fn linux_invokes_tools_with_expected_arguments() {
        let tmp = setup_project("cstitch");
        let tools = MockTools::new();

        linux(
            tmp.path(),
            &ReleaseConfig::default(),
            "0.9.4",
            Path::new("cstitch"),
            &tools,
        )
        .unwrap();

        let calls = tools.get_calls();
        assert_eq!(
            calls[0].args,
            vec!["--set-interpreter", "/lib/ld-linux.so.2", "cstitch"]
        );
        assert_eq!(calls[1].args, vec!["cstitch"]);
        assert_eq!(
            calls[2].args,
            vec![
                "czf",
                "cstitch_0.9.4_linux32.tar.gz",
                "--transform=s@^@cstitch_0.9.4/@",
                "cstitch",
                "-C",
                "doc/web",
                "README_linux"
            ]
        );
    }

    #[test]
    fn linux_moves_archive_into_versions() {
        let tmp = setup_project("cstitch");
        let versions = tmp.path().join("versions");
        fs::create_dir_all(&versions).unwrap();
        fs::write(versions.join("cstitch_0.9.4_linux32.tar.gz"), "old").unwrap();

        let archive = linux(
            tmp.path(),
            &ReleaseConfig::default(),
            "0.9.4",
            Path::new("cstitch"),
            &MockTools::new(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&archive).unwrap(), "tarball");
        assert!(!tmp.path().join("cstitch_0.9.4_linux32.tar.gz").exists());
    }

    #[test]
    fn linux_patch_failure_stops_before_packing() {
        let tmp = setup_project("cstitch");
        let tools = MockTools::with_exit_code("patchelf", 1);

        let result = linux(
            tmp.path(),
            &ReleaseConfig::default(),
            "0.9.4",
            Path::new("cstitch"),
            &tools,
        );

        assert!(matches!(
            result,
            Err(ReleaseError::ToolFailed { ref program, status: 1 }) if program == "patchelf"
        ));
        assert_eq!(tools.programs(), vec!["patchelf"]);
    }

    #[test]
    fn linux_other_upx_failure_is_tool_failed() {
        let tmp = setup_project("cstitch");
        let tools = MockTools::with_exit_code("upx", 1);

        let result = linux(
            tmp.path(),
            &ReleaseConfig::default(),
            "0.9.4",
            Path::new("cstitch"),
            &tools,
        );

        assert!(matches!(result, Err(ReleaseError::ToolFailed { status: 1, .. })));
    }
}
