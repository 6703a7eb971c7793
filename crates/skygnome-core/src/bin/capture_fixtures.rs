use std::fs;
use std::path::{Path, PathBuf};

use skygnome_core::PacketBuilder;

fn main() -> Result<(), String> {
    let root = PathBuf::from("tests/golden");
    write_guide_fixture(&root)?;
    write_resync_fixture(&root)?;
    Ok(())
}

/// A channel change with full guide data, a trickplay update and a status
/// packet carrying a code the decoder does not know.
fn write_guide_fixture(root: &Path) -> Result<(), String> {
    let mut capture = PacketBuilder::new()
        .block("SSCN", "101")
        .block("SSCA", "BBC One")
        .block("SST0", "7.30pm")
        .block("SSN0", "The Detective...")
        .block(
            "SSE0",
            "...Final Case: The inspector faces a dilemma. (S3, Ep 6) [HD,S,AD] Contains violence and strong language.",
        )
        .to_bytes();
    capture.extend(PacketBuilder::new().block("SSEI", "PAUSE").to_bytes());
    capture.extend(
        PacketBuilder::new()
            .block("SYST", "0")
            .block("SYIC", "8080")
            .block("PUCP", "Enter PIN")
            .block("ZZZZ", "hi")
            .to_bytes(),
    );
    write_capture(&root.join("guide").join("input.bin"), &capture)
}

/// Line noise before the first marker, two packets cut short by a new
/// marker, two good packets and one whose only block is too short.
fn write_resync_fixture(root: &Path) -> Result<(), String> {
    let mut capture = b"junk before marker\nabc\n050partial".to_vec();
    capture.extend(PacketBuilder::new().block("SSCA", "Sky Atlantic").to_bytes());
    capture.extend(PacketBuilder::new().block("CE00", "10_").to_bytes());
    capture.extend_from_slice(b"\n010SSCN000");
    write_capture(&root.join("resync").join("input.bin"), &capture)
}

fn write_capture(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
    }
    fs::write(path, bytes).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
