//! Interactive input for `pinlink upload` without arguments

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use pinlink_core::types::DeployRequest;

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask for path, domain and DNS mode; yields the same request the flags would.
pub fn prompt_deploy_request<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<DeployRequest> {
    let path = ask(input, output, "Path to deploy: ")?;
    if path.is_empty() {
        bail!("No path given");
    }
    let request = DeployRequest::new(PathBuf::from(path));

    let domain = ask(input, output, "Domain to bind (leave empty to skip): ")?;
    if domain.is_empty() {
        return Ok(request);
    }

    let force_dns = if domain.contains('.') {
        false
    } else {
        let answer = ask(input, output, "Treat it as a custom DNS domain? [y/N]: ")?;
        matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
    };

    Ok(request.with_domain(domain, force_dns))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> Result<DeployRequest> {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        prompt_deploy_request(&mut input, &mut output)
    }

    #[test]
    fn test_path_only() {
        let request = run("./dist\n\n").unwrap();
        assert_eq!(request, DeployRequest::new("./dist"));
    }

    #[test]
    fn test_subdomain_not_forced() {
        let request = run("./dist\nmy-site\nn\n").unwrap();
        assert_eq!(request, DeployRequest::new("./dist").with_domain("my-site", false));
    }

    #[test]
    fn test_label_forced_to_dns() {
        let request = run("./dist\nintranet\nyes\n").unwrap();
        assert!(request.force_dns);
    }

    #[test]
    fn test_dotted_domain_skips_question() {
        let mut input = Cursor::new(b"./dist\nexample.com\n".to_vec());
        let mut output = Vec::new();
        let request = prompt_deploy_request(&mut input, &mut output).unwrap();
        assert_eq!(request.domain.as_deref(), Some("example.com"));
        assert!(!String::from_utf8(output).unwrap().contains("[y/N]"));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(run("\n").is_err());
    }
}
