fn main() -> std::process::ExitCode {
    fightclip_lib::run()
}
