//! Shared fixtures for ariadne integration tests.
//!
//! [`shop`] writes a two-project solution:
//!
//! - `Shop.Core`: `ICalculator`, `Calculator : ICalculator`,
//!   `ScientificCalculator : Calculator`
//! - `Shop.App` (references `Shop.Core`): `Program`, `ReportService` (takes an
//!   `ICalculator`), step definitions, and feature files under `Features/`
//!
//! Line numbers asserted by the tests refer to the sources below, which all
//! start on line 1.

#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use ariadne::{Navigator, Workspace};
use tempfile::TempDir;

pub const SOLUTION: &str = r#"Microsoft Visual Studio Solution File, Format Version 12.00
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop.Core", "Shop.Core\Shop.Core.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Shop.App", "Shop.App\Shop.App.csproj", "{22222222-2222-2222-2222-222222222222}"
EndProject
"#;

pub const CORE_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#;

pub const APP_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <ItemGroup>
    <ProjectReference Include="..\Shop.Core\Shop.Core.csproj" />
  </ItemGroup>
</Project>
"#;

pub const CALCULATOR: &str = r#"using System;

namespace Shop.Core
{
    public class Calculator : ICalculator
    {
        public virtual int Add(int a, int b)
        {
            return a + b;
        }

        public int Add(int a, int b, int c)
        {
            return Add(a, b) + c;
        }

        [Obsolete("Use Add instead")]
        public int Sum(int a, int b) => a + b;
    }
}
"#;

pub const ICALCULATOR: &str = r"namespace Shop.Core
{
    public interface ICalculator
    {
        int Add(int a, int b);
    }
}
";

pub const SCIENTIFIC_CALCULATOR: &str = r"namespace Shop.Core
{
    public class ScientificCalculator : Calculator
    {
        public override int Add(int a, int b)
        {
            return base.Add(a, b);
        }

        public double Square(double x) => x * x;
    }
}
";

pub const PROGRAM: &str = r#"using Shop.Core;

namespace Shop.App
{
    public static class Program
    {
        public static void Main()
        {
            var calculator = new Calculator();
            var total = calculator.Add(1, 2);
            Calculator scientific = new ScientificCalculator();
            Calculator other = new();
            var report = new ReportService(calculator, "daily");
        }
    }
}
"#;

pub const REPORT_SERVICE: &str = r"using Shop.Core;

namespace Shop.App
{
    public class ReportService
    {
        private readonly ICalculator _calculator;

        public ReportService(ICalculator calculator, string title)
        {
            _calculator = calculator;
            Title = title;
        }

        public string Title { get; }

        public int Total(int a, int b)
        {
            return _calculator.Add(a, b);
        }
    }
}
";

pub const CALCULATOR_STEPS: &str = r#"using System;
using TechTalk.SpecFlow;

namespace Shop.App.Steps
{
    [Binding]
    public class CalculatorSteps
    {
        [Given(@"I have entered (.*) into the calculator")]
        public void GivenIHaveEntered(int number)
        {
        }

        [When("I press add")]
        [Obsolete]
        public void WhenIPressAdd()
        {
        }

        [Then(@"the result should be (.*) on the screen")]
        public void ThenTheResultShouldBe(int result)
        {
        }
    }
}
"#;

pub const CALCULATOR_FEATURE: &str = "Feature: Calculator
  In order to avoid silly mistakes

  Scenario: Add two numbers
    Given I have entered 50 into the calculator

  Scenario Outline: Add many numbers
    Given I have entered <a> into the calculator

    Examples:
      | a |
      | 1 |
";

pub const PORTUGUESE_FEATURE: &str = "# language: pt
Funcionalidade: Calculadora

  Cenário: Somar dois números
    Dado que eu digitei 50
";

/// Write `files` under a fresh temporary directory.
pub fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }
    dir
}

/// The shop solution on disk. Keep the returned directory alive.
pub fn shop_files() -> TempDir {
    write_files(&[
        ("Shop.sln", SOLUTION),
        ("Shop.Core/Shop.Core.csproj", CORE_PROJECT),
        ("Shop.Core/Calculator.cs", CALCULATOR),
        ("Shop.Core/ICalculator.cs", ICALCULATOR),
        ("Shop.Core/ScientificCalculator.cs", SCIENTIFIC_CALCULATOR),
        ("Shop.App/Shop.App.csproj", APP_PROJECT),
        ("Shop.App/Program.cs", PROGRAM),
        ("Shop.App/ReportService.cs", REPORT_SERVICE),
        ("Shop.App/Steps/CalculatorSteps.cs", CALCULATOR_STEPS),
        ("Features/Calculator.feature", CALCULATOR_FEATURE),
        ("Features/pt/Calculadora.feature", PORTUGUESE_FEATURE),
    ])
}

/// A navigator over the shop solution.
pub fn shop() -> (TempDir, Navigator) {
    let dir = shop_files();
    let workspace =
        Workspace::load(&dir.path().join("Shop.sln")).expect("failed to load shop solution");
    (dir, Navigator::new(Arc::new(workspace)))
}

/// A navigator over loose sources in a directory, loaded as one project.
pub fn workspace_with_files(files: &[(&str, &str)]) -> (TempDir, Navigator) {
    let dir = write_files(files);
    let workspace = Workspace::load(dir.path()).expect("failed to load workspace");
    (dir, Navigator::new(Arc::new(workspace)))
}
