//! Integration smoke tests for `academic_progress`

use academic_progress::get_version;

#[test]
fn version_is_not_empty() {
    let v = get_version();
    assert!(!v.trim().is_empty());
}
