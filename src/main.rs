fn main() -> std::process::ExitCode {
    leaf_lens_lib::run()
}
