//! Command-line driver: load a structure, rock the camera, dump views.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use molview::animation::AnimateState;
use molview::controller::{LoadPhase, SceneController};
use molview::data_source::{MemoryDataServer, ProteinData};
use molview::error::MolviewError;
use molview::options::Options;
use molview::scheduler::Scheduler;

const ROCK_TICKS: u32 = 120;

struct Args {
    structure: PathBuf,
    dump_views: Option<PathBuf>,
    options: Option<PathBuf>,
}

fn parse_args() -> Option<Args> {
    let mut args = std::env::args().skip(1);
    let mut structure = None;
    let mut dump_views = None;
    let mut options = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dump-views" => dump_views = Some(PathBuf::from(args.next()?)),
            "--options" => options = Some(PathBuf::from(args.next()?)),
            _ if structure.is_none() => structure = Some(PathBuf::from(arg)),
            _ => return None,
        }
    }
    Some(Args {
        structure: structure?,
        dump_views,
        options,
    })
}

fn structure_id(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure")
        .to_owned()
}

fn run(args: &Args) -> Result<(), MolviewError> {
    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let ms_per_step = options.camera.ms_per_step;
    let text = std::fs::read_to_string(&args.structure)?;
    let mut server = MemoryDataServer::new(ProteinData {
        structure_id: structure_id(&args.structure),
        structure_text: text,
    });

    let mut controller = SceneController::new(options);
    let _ = pollster::block_on(controller.load_from_data_server(
        &mut server,
        &mut |phase: LoadPhase, message: &str| {
            log::info!("[{phase:?}] {message}");
        },
    ))?;

    let soup = controller.soup();
    log::info!(
        "{} atoms, {} residues, {} traces, {} pieces, {} bonds",
        soup.atom_count(),
        soup.residue_count(),
        soup.traces().len(),
        soup.topology().piece_count(),
        soup.bonds().len()
    );

    controller.set_animate_state(AnimateState::Rock);
    let controller = Rc::new(RefCell::new(controller));
    let mut scheduler = Scheduler::new(ms_per_step);
    scheduler.register(controller.clone());
    let mut draws = 0;
    for _ in 0..ROCK_TICKS {
        draws += scheduler.run_steps(1);
    }
    log::info!("rocked {ROCK_TICKS} ticks, {draws} redraws");

    if let Some(path) = &args.dump_views {
        let mut controller = controller.borrow_mut();
        let _ = controller.save_current_view();
        let dicts = controller.view_model().view_dicts();
        let json = serde_json::to_string_pretty(&dicts)?;
        std::fs::write(path, json)?;
        log::info!("wrote {} views to {}", dicts.len(), path.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let Some(args) = parse_args() else {
        log::error!(
            "Usage: molview <file.pdb> [--dump-views <path>] [--options <preset.toml>]"
        );
        std::process::exit(2);
    };

    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
