#[test]
fn phub_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/phub_error_pass.rs");
    t.pass("tests/ui/phub_error_class_pass.rs");
}

#[test]
fn phub_slice_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/phub_slice_pass.rs");
}
