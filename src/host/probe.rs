use crate::error::OpError;

/// Location of the converter binary, when this platform has a conventional
/// install path.
pub(super) fn dng_converter_binary() -> Option<&'static str> {
    #[cfg(target_os = "macos")]
    {
        return Some("/Applications/Adobe DNG Converter.app/Contents/MacOS/Adobe DNG Converter");
    }
    #[cfg(target_os = "windows")]
    {
        return Some(r"C:\Program Files\Adobe\Adobe DNG Converter\Adobe DNG Converter.exe");
    }
    #[allow(unreachable_code)]
    None
}

/// Whether the Adobe DNG Converter is installed. Callers gate the convert
/// toggle on this and treat an error as unavailable.
pub(super) async fn is_dng_converter_available() -> Result<bool, OpError> {
    #[cfg(target_os = "macos")]
    {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg("mdfind 'kMDItemFSName == \"Adobe DNG Converter.app\"'")
            .output()
            .await?;
        return Ok(!output.stdout.is_empty());
    }
    #[cfg(target_os = "windows")]
    {
        let output = tokio::process::Command::new("powershell")
            .args([
                "-Command",
                "Get-Command -Name 'Adobe DNG Converter' -ErrorAction SilentlyContinue",
            ])
            .output()
            .await?;
        return Ok(output.status.success());
    }
    #[allow(unreachable_code)]
    Err(OpError::UnsupportedPlatform("DNG converter probe"))
}
