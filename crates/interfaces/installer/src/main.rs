#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use installer_ui::CommandSpec;

const USAGE: &str = "usage: installer --shell '<command line>'\n       installer <program> [args...]";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.as_slice() {
        [] => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
        [flag, line] if flag == "--shell" => CommandSpec::shell(line.as_str()),
        [flag, ..] if flag == "--shell" => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
        _ => CommandSpec::argv(args.clone()),
    };

    let command = match command {
        Ok(command) => command,
        Err(err) => {
            eprintln!("Installer failed: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = installer_ui::run(command) {
        eprintln!("Installer failed: {err}");
        std::process::exit(1);
    }
}
