use nes_cpu::rom::Rom;
use nes_cpu::six502::{Config, Entry};
use nes_cpu::{Nes, RunState};
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::process;

const USAGE: &str =
    "usage: nes-cpu <rom.nes> [--quiet] [--strict] [--reset-vector] [--max-steps N]";

struct Args {
    rom: String,
    quiet: bool,
    config: Config,
    max_steps: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, Box<dyn Error>> {
    let mut rom = None;
    let mut quiet = false;
    let mut config = Config::default();
    let mut max_steps = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--quiet" => quiet = true,
            "--strict" => config.undocumented = false,
            "--reset-vector" => config.entry = Entry::ResetVector,
            "--max-steps" => {
                let n = args.next().ok_or("--max-steps needs a number")?;
                max_steps = Some(
                    n.parse::<u64>()
                        .map_err(|e| format!("bad --max-steps {:?}: {}", n, e))?,
                );
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag).into()),
            path if rom.is_none() => rom = Some(path.to_string()),
            extra => return Err(format!("unexpected argument {}", extra).into()),
        }
    }

    Ok(Args {
        rom: rom.ok_or("missing rom path")?,
        quiet,
        config,
        max_steps,
    })
}

fn run(args: Args) -> Result<RunState, Box<dyn Error>> {
    let rom = Rom::open(&args.rom)?;
    let mut nes = Nes::new(&rom, args.config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let trace: Option<&mut dyn Write> = if args.quiet { None } else { Some(&mut out) };
    let state = nes.run(args.max_steps, trace)?.clone();
    out.flush()?;

    log::info!(
        "{} instructions, {} cycles",
        nes.steps(),
        nes.cpu().cycles()
    );
    Ok(state)
}

fn main() {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            process::exit(1);
        }
    };

    match run(args) {
        Ok(RunState::Faulted(e)) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
