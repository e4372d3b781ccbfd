//! `setup.py` manifest generation.

/// Render the package's `setup.py`.
///
/// The output is byte-stable: literal list rendering and fixed field order,
/// since deployed packages are compared against previously built ones.
pub fn setup_file_content(requirements: &[String], name: &str, description: &str) -> String {
    let quoted: Vec<String> = requirements.iter().map(|r| format!("\"{r}\"")).collect();

    let mut lines = Vec::new();
    lines.push("from setuptools import find_packages, setup".to_string());
    lines.push(String::new());
    lines.push(format!("REQUIRED_PACKAGES = [{}]", quoted.join(", ")));
    lines.push("setup(".to_string());
    lines.push(format!("    name=\"{name}\","));
    lines.push("    version=\"1.0\",".to_string());
    lines.push("    install_requires=REQUIRED_PACKAGES,".to_string());
    lines.push("    packages=find_packages(),".to_string());
    lines.push(format!("    description=\"{description}\","));
    lines.push(")".to_string());

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_file_content() {
        let requirements = vec!["numpy".to_string(), "pandas==1.2.3".to_string()];
        let expected = "\
from setuptools import find_packages, setup

REQUIRED_PACKAGES = [\"numpy\", \"pandas==1.2.3\"]
setup(
    name=\"some_name\",
    version=\"1.0\",
    install_requires=REQUIRED_PACKAGES,
    packages=find_packages(),
    description=\"some description\",
)
";
        assert_eq!(
            setup_file_content(&requirements, "some_name", "some description"),
            expected
        );
    }

    #[test]
    fn test_empty_requirements() {
        let content = setup_file_content(&[], "pkg", "");
        assert!(content.contains("REQUIRED_PACKAGES = []"));
        assert!(content.contains("description=\"\","));
    }
}
