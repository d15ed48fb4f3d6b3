use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::CliTest;

const SDK_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

/// Accessor in the shape `ResXFileCodeGenerator` emits.
const RESOURCES_DESIGNER: &str = r#"namespace App.Properties {
    using System;

    internal class Resources {

        private static global::System.Resources.ResourceManager resourceMan;

        private static global::System.Globalization.CultureInfo resourceCulture;

        internal Resources() {
        }

        /// <summary>
        ///   Returns the cached ResourceManager instance used by this class.
        /// </summary>
        internal static global::System.Resources.ResourceManager ResourceManager {
            get {
                if (object.ReferenceEquals(resourceMan, null)) {
                    resourceMan = new global::System.Resources.ResourceManager("App.Properties.Resources", typeof(Resources).Assembly);
                }
                return resourceMan;
            }
        }

        /// <summary>
        ///   Overrides the current thread's CurrentUICulture property for all
        ///   resource lookups using this strongly typed resource class.
        /// </summary>
        internal static global::System.Globalization.CultureInfo Culture {
            get {
                return resourceCulture;
            }
            set {
                resourceCulture = value;
            }
        }

        /// <summary>
        ///   Looks up a localized string similar to Hello.
        /// </summary>
        internal static string Greeting {
            get {
                return ResourceManager.GetString("Greeting", resourceCulture);
            }
        }

        /// <summary>
        ///   Looks up a localized string similar to Hello.
        /// </summary>
        internal static string Salutation {
            get {
                return ResourceManager.GetString("Salutation", resourceCulture);
            }
        }

        /// <summary>
        ///   Looks up a localized string similar to Goodbye.
        /// </summary>
        internal static string Farewell {
            get {
                return ResourceManager.GetString("Farewell", resourceCulture);
            }
        }
    }
}
"#;

/// Accessor in the shape the Arcade resource generator emits.
const STRINGS_GENERATED: &str = r#"namespace Lib
{
    internal static partial class Strings
    {
        private static global::System.Resources.ResourceManager s_resourceManager;
        internal static global::System.Resources.ResourceManager ResourceManager => s_resourceManager ?? (s_resourceManager = new global::System.Resources.ResourceManager(typeof(Strings)));
        internal static global::System.Globalization.CultureInfo Culture { get; set; }
        [global::System.Runtime.CompilerServices.MethodImpl(global::System.Runtime.CompilerServices.MethodImplOptions.AggressiveInlining)]
        internal static string GetResourceString(string resourceKey, string defaultValue = null) =>  ResourceManager.GetString(resourceKey, Culture);
        /// <summary>Save</summary>
        internal static string @SaveButton => GetResourceString("SaveButton");
        /// <summary>Cancel</summary>
        internal static string @CancelButton => GetResourceString("CancelButton");
    }
}
"#;

const UNIQUE_RESOURCES: &str = r#"namespace App {
    internal class Resources {
        internal static object ResourceManager => null;

        /// <summary>Save</summary>
        internal static string Save => "";

        /// <summary>Open</summary>
        internal static string Open => "";
    }
}
"#;

#[test]
fn test_duplicates_in_one_accessor() -> Result<()> {
    let test = CliTest::with_file("App/App.csproj", SDK_PROJECT)?;
    test.write_file("App/Properties/Resources.Designer.cs", RESOURCES_DESIGNER)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(1));
    assert_eq!(
        outcome.stdout,
        "Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.
Loading solution 'App.sln'
Finished loading solution 'App.sln'
The following resx files have duplicate values 'Looks up a localized string similar to Hello.':
  P:App.Properties.Resources.Greeting
  P:App.Properties.Resources.Salutation
"
    );
    assert_eq!(outcome.stderr, "");

    Ok(())
}

#[test]
fn test_duplicates_across_projects() -> Result<()> {
    let test = CliTest::with_file("App/App.csproj", SDK_PROJECT)?;
    test.write_file("App/Resources.Designer.cs", UNIQUE_RESOURCES)?;
    test.write_file("Lib/Lib.csproj", SDK_PROJECT)?;
    test.write_file("Lib/obj/Debug/net8.0/Lib.Strings.cs", STRINGS_GENERATED)?;
    test.write_solution(&[("App", "App\\App.csproj"), ("Lib", "Lib\\Lib.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(1));
    insta::assert_snapshot!(outcome.stdout, @r"
    Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.
    Loading solution 'App.sln'
    Finished loading solution 'App.sln'
    The following resx files have duplicate values 'Save':
      P:App.Resources.Save
      P:Lib.Strings.SaveButton
    ");

    Ok(())
}

#[test]
fn test_no_duplicates() -> Result<()> {
    let test = CliTest::with_file("App/App.csproj", SDK_PROJECT)?;
    test.write_file("App/Resources.Designer.cs", UNIQUE_RESOURCES)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(0));
    assert_eq!(
        outcome.stdout,
        "Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.
Loading solution 'App.sln'
Finished loading solution 'App.sln'
"
    );

    Ok(())
}

#[test]
fn test_multi_target_project_is_not_a_duplicate_of_itself() -> Result<()> {
    let test = CliTest::with_file(
        "App/App.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFrameworks>net8.0;net472</TargetFrameworks>
  </PropertyGroup>
</Project>
"#,
    )?;
    test.write_file("App/Resources.Designer.cs", UNIQUE_RESOURCES)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(0));
    assert!(!outcome.stdout.contains("duplicate values"));

    let outcome = test.run(test.check_command().arg("-v"))?;

    assert!(
        outcome
            .stderr
            .ends_with("note: 2 resource entries checked, 0 duplicate values across 0 keys\n")
    );

    Ok(())
}

#[test]
fn test_ignored_sources_are_not_scanned() -> Result<()> {
    let test = CliTest::with_file("App/App.csproj", SDK_PROJECT)?;
    test.write_file("App/Properties/Resources.Designer.cs", RESOURCES_DESIGNER)?;
    test.write_file(".resxduprc.json", r#"{ "ignores": ["App/Properties/**"] }"#)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(0));
    assert!(!outcome.stdout.contains("duplicate values"));

    Ok(())
}

#[test]
fn test_compile_remove_drops_accessor() -> Result<()> {
    let test = CliTest::with_file(
        "App/App.csproj",
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
  <ItemGroup>
    <Compile Remove="Properties\Resources.Designer.cs" />
  </ItemGroup>
</Project>
"#,
    )?;
    test.write_file("App/Properties/Resources.Designer.cs", RESOURCES_DESIGNER)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(0));

    Ok(())
}

#[test]
fn test_empty_solution() -> Result<()> {
    let test = CliTest::new()?;
    test.write_solution(&[])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(2));
    assert_eq!(
        outcome.stdout,
        "Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.
Loading solution 'App.sln'
Finished loading solution 'App.sln'
Unable to get compilations
"
    );

    Ok(())
}

#[test]
fn test_missing_project_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_solution(&[("Gone", "Gone\\Gone.csproj")])?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(2));
    assert!(outcome.stdout.ends_with("Unable to get compilations\n"));

    let outcome = test.run(test.check_command().arg("-v"))?;

    assert!(outcome.stderr.contains("Failed to load project '[ROOT]/Gone/Gone.csproj'"));

    Ok(())
}

#[test]
fn test_missing_solution_file() -> Result<()> {
    let test = CliTest::new()?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(2));
    assert_eq!(
        outcome.stdout,
        "Using MSBuild at '[ROOT]/dotnet/sdk/8.0.100' to load projects.
Loading solution 'App.sln'
"
    );
    assert_eq!(
        outcome.stderr,
        "Error: Failed to load solution '[ROOT]/App.sln': file does not exist\n"
    );

    Ok(())
}

#[test]
fn test_not_a_solution_file() -> Result<()> {
    let test = CliTest::with_file("App.sln", "hello")?;

    let outcome = test.run(&mut test.check_command())?;

    assert_eq!(outcome.code, Some(2));
    assert!(outcome.stderr.starts_with("Error: Failed to load solution '[ROOT]/App.sln'"));

    Ok(())
}

#[test]
fn test_verbose_progress() -> Result<()> {
    let test = CliTest::with_file("App/App.csproj", SDK_PROJECT)?;
    test.write_file("App/Resources.Designer.cs", UNIQUE_RESOURCES)?;
    test.write_solution(&[("App", "App\\App.csproj")])?;

    let outcome = test.run(test.check_command().arg("--verbose"))?;

    assert_eq!(outcome.code, Some(0));
    assert_eq!(
        outcome.stderr,
        "Evaluate        App.csproj
Build           App.csproj (net8.0)
note: 2 resource entries checked, 0 duplicate values across 0 keys
"
    );

    Ok(())
}

#[test]
fn test_solution_is_required() -> Result<()> {
    let test = CliTest::new()?;

    let outcome = test.run(&mut test.command())?;

    assert_eq!(outcome.code, Some(2));
    assert!(outcome.stderr.contains("<SOLUTION>"));

    Ok(())
}
