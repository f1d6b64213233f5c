use anyhow::Result;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::RunErrors;
use crate::pipeline::Report;
use crate::util::{fingerprint_sha256, issuer_cn};

pub fn print_bold<W: WriteColor>(w: &mut W, text: &str) -> Result<()> {
    w.set_color(ColorSpec::new().set_bold(true))?;
    write!(w, "{}", text)?;
    w.reset()?;
    Ok(())
}

// One entry per written certificate: label, CA flag, issuer and fingerprint.
pub fn print_report(report: &Report, output: &std::path::Path) -> Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    writeln!(
        &mut stdout,
        "--- {} certificate(s) from {} leaf certificate(s), {} issuer(s) fetched ---",
        report.certificates.len(),
        report.leaves,
        report.issuers
    )?;
    for (i, cert) in report.certificates.iter().enumerate() {
        writeln!(&mut stdout, "[{}]", i + 1)?;
        write!(&mut stdout, "  ")?;
        print_bold(&mut stdout, "Subject:")?;
        writeln!(&mut stdout, " {}", cert.label())?;
        if let Some(cn) = issuer_cn(cert.x509()) {
            write!(&mut stdout, "  ")?;
            print_bold(&mut stdout, "Issuer:")?;
            writeln!(&mut stdout, " CN={}", cn)?;
        }
        write!(&mut stdout, "  ")?;
        print_bold(&mut stdout, "CA:")?;
        writeln!(&mut stdout, " {}", if cert.is_ca() { "yes" } else { "no" })?;
        write!(&mut stdout, "  ")?;
        print_bold(&mut stdout, "SHA-256 Fingerprint:")?;
        writeln!(&mut stdout, " {}", fingerprint_sha256(cert.x509())?)?;
    }
    writeln!(&mut stdout)?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(&mut stdout, "✅ wrote {}", output.display())?;
    stdout.reset()?;
    writeln!(&mut stdout)?;
    Ok(())
}

pub fn print_errors(errors: &RunErrors) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(&mut stderr, "❌ {} error(s):", errors.len())?;
    stderr.reset()?;
    writeln!(&mut stderr)?;
    for e in errors.iter() {
        writeln!(&mut stderr, "- {}", e)?;
    }
    Ok(())
}
