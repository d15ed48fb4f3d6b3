use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, SDK_VERSION};

#[test]
fn test_list_toolchains_newest_first() -> Result<()> {
    let test = CliTest::with_file("dotnet/sdk/9.0.100/MSBuild.dll", "")?;
    test.write_file("dotnet/sdk/9.0.100-preview.1/MSBuild.dll", "")?;
    test.write_file("dotnet/sdk/7.0.400/readme.txt", "not an sdk")?;

    let outcome = test.run(
        test.command()
            .arg("--list-toolchains")
            .arg("--msbuild-path")
            .arg(test.root().join("dotnet")),
    )?;

    assert_eq!(outcome.code, Some(0));
    insta::assert_snapshot!(outcome.stdout, @r"
    Instance 1
        Name: .NET Core SDK
        Version: 9.0.100
        MSBuild Path: [ROOT]/dotnet/sdk/9.0.100
    Instance 2
        Name: .NET Core SDK
        Version: 9.0.100-preview.1
        MSBuild Path: [ROOT]/dotnet/sdk/9.0.100-preview.1
    Instance 3
        Name: .NET Core SDK
        Version: 8.0.100
        MSBuild Path: [ROOT]/dotnet/sdk/8.0.100
    ");

    Ok(())
}

#[test]
fn test_list_toolchains_none_found() -> Result<()> {
    let test = CliTest::new()?;

    let outcome = test.run(
        test.command()
            .arg("--list-toolchains")
            .arg("--msbuild-path")
            .arg(test.root().join("missing")),
    )?;

    assert_eq!(outcome.code, Some(1));
    assert_eq!(outcome.stdout, "No MSBuild instances found\n");

    Ok(())
}

#[test]
fn test_sdk_version_selects_instance() -> Result<()> {
    let test = CliTest::with_file("dotnet/sdk/9.0.100/MSBuild.dll", "")?;
    test.write_solution(&[])?;

    let outcome = test.run(test.check_command().args(["--sdk-version", SDK_VERSION]))?;

    assert!(
        outcome
            .stdout
            .starts_with("Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.\n")
    );

    let outcome = test.run(&mut test.check_command())?;

    assert!(
        outcome
            .stdout
            .starts_with("Using MSBuild at '[ROOT]/dotnet/sdk/9.0.100' to load projects.\n")
    );

    Ok(())
}

#[test]
fn test_missing_sdk_version_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_solution(&[])?;

    let outcome = test.run(test.check_command().args(["--sdk-version", "1.0.0-never"]))?;

    assert_eq!(outcome.code, Some(2));
    assert_eq!(outcome.stdout, "");
    assert_eq!(
        outcome.stderr,
        "Error: No MSBuild instance found: SDK version '1.0.0-never' is not installed\n"
    );

    Ok(())
}

#[test]
fn test_msbuild_path_from_config() -> Result<()> {
    let test = CliTest::with_file("tools/sdk/MSBuild.dll", "")?;
    test.write_file(".resxduprc.json", r#"{ "msbuildPath": "tools/sdk" }"#)?;
    test.write_solution(&[])?;

    let outcome = test.run(&mut test.check_command())?;

    assert!(
        outcome
            .stdout
            .starts_with("Using MSBuild at '[ROOT]/tools/sdk' to load projects.\n")
    );

    Ok(())
}

#[test]
fn test_explicit_path_without_msbuild_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_solution(&[])?;

    let outcome = test.run(
        test.check_command()
            .arg("--msbuild-path")
            .arg(test.root().join("empty")),
    )?;

    assert_eq!(outcome.code, Some(2));
    assert_eq!(
        outcome.stderr,
        "Error: No MSBuild instance found: '[ROOT]/empty' does not contain MSBuild.dll\n"
    );

    Ok(())
}
