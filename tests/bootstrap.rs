//==============================================
// File: tests/bootstrap.rs
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Verify stdlib assembly and builtin registration at embed time
// Objective: Cover directory, embedded and in-memory resources plus failure
//==============================================

use std::fs;

use cub_stdlib::{
    AssemblerState, DirectoryProvider, EmbedConfig, EmbeddedProvider, HostRegistry,
    MemoryProvider, ResourceRoot, StdLibAssembler, StdLibError, bootstrap,
    builtins::BUILTIN_NAMES,
};
use tempfile::tempdir;

#[test]
fn source_tree_and_embedded_sources_agree() {
    let config = EmbedConfig::default();
    let from_disk = bootstrap(
        &mut HostRegistry::new(),
        DirectoryProvider::new(ResourceRoot::SourceTree),
        &config,
    )
    .expect("source tree stdlib");
    let embedded = bootstrap(&mut HostRegistry::new(), EmbeddedProvider, &config)
        .expect("embedded stdlib");
    assert_eq!(from_disk, embedded);

    let arithmetic = from_disk.find("func abs").expect("Arithmetic present");
    let graphics = from_disk.find("struct Point").expect("Graphics present");
    assert!(arithmetic < graphics, "Arithmetic must precede Graphics");
}

#[test]
fn bootstrap_registers_builtins_after_assembly() {
    let provider = MemoryProvider::new()
        .with_module("Arithmetic", "A")
        .with_module("Graphics", "G");
    let mut registry = HostRegistry::new();
    let prologue = bootstrap(&mut registry, provider, &EmbedConfig::default()).expect("bootstrap");
    assert_eq!(prologue, "AG");
    for name in &BUILTIN_NAMES[..9] {
        assert!(registry.contains(name), "{name} missing");
    }
}

#[test]
fn missing_module_fails_without_registering() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("Arithmetic.cub"), "func abs(x) {}\n").expect("write");
    let provider = DirectoryProvider::new(ResourceRoot::Bundled(dir.path().to_path_buf()));

    let mut registry = HostRegistry::new();
    let err = bootstrap(&mut registry, provider, &EmbedConfig::default())
        .expect_err("Graphics is absent");
    assert!(
        matches!(&err, StdLibError::ResourceNotFound { module } if module == "Graphics"),
        "{err:?}"
    );
    assert!(registry.is_empty());
}

#[test]
fn configured_modules_and_root_are_honoured() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("Strings.cub"), "// strings\n").expect("write");
    let config = EmbedConfig::from_toml_str(&format!(
        "[stdlib]\nmodules = [\"Strings\"]\nroot = {:?}\n\n[calendar]\ntime_zone = \"utc\"\n",
        dir.path().display().to_string()
    ))
    .expect("config");

    let mut registry = HostRegistry::new();
    let prologue = bootstrap(&mut registry, config.provider(), &config).expect("bootstrap");
    assert_eq!(prologue, "// strings\n");
}

#[test]
fn assembler_runs_once() {
    let mut assembler = StdLibAssembler::new(EmbeddedProvider);
    assert_eq!(assembler.state(), AssemblerState::Idle);
    assembler.assemble().expect("first run");
    assert_eq!(assembler.state(), AssemblerState::Assembled);
    assert!(matches!(
        assembler.assemble(),
        Err(StdLibError::AlreadyRun { .. })
    ));
}

//==============================================
// End of file
//==============================================
