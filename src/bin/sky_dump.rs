use clap::{Arg, ArgAction, Command};

use skysphere::backend::{BackendCall, RecordingBackend};
use skysphere::error::SkyResult;
use skysphere::model::{MIN_LATS, MIN_LONGS};
use skysphere::sky::Sky;

/******************************************************************************/

fn cli() -> Command {
    let args = [
        Arg::new("lats")
            .long("lats")
            .action(ArgAction::Set)
            .value_name("LATS")
            .value_parser(clap::value_parser!(u32).range(MIN_LATS as i64..))
            .default_value("4")
            .help("Number of latitude bands"),
        Arg::new("longs")
            .long("longs")
            .action(ArgAction::Set)
            .value_name("LONGS")
            .value_parser(clap::value_parser!(u32).range(MIN_LONGS as i64..))
            .default_value("5")
            .help("Number of longitude divisions"),
        Arg::new("no-texture")
            .long("no-texture")
            .action(ArgAction::SetTrue)
            .help("Skip texture coordinates"),
        Arg::new("vertices")
            .long("vertices")
            .action(ArgAction::SetTrue)
            .help("Print every uploaded attribute and index value"),
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Enable debug printing"),
    ];
    Command::new("sky_dump")
        .about("Builds a sky sphere without a GL context and prints its buffers and draw calls")
        .args(&args)
}

fn init_logger(debug: bool) {
    let log_level: &str = if debug {
        "debug"
    } else {
        "info"
    };
    let env = env_logger::Env::default()
        .filter_or("SKY_LOG_LEVEL", log_level)
        .write_style_or("SKY_LOG_STYLE", "always");
    env_logger::init_from_env(env);
}

fn print_floats(data: &[f32], components: usize) {
    for (n, chunk) in data.chunks(components).enumerate() {
        let values: Vec<String> = chunk.iter().map(|v| format!("{v:>9.5}")).collect();
        println!("  {n:>5}: {}", values.join(" "));
    }
}

fn dump(lats: u32, longs: u32, use_texture: bool, vertices: bool) -> SkyResult<()> {
    let mut sky = Sky::new(RecordingBackend::new(), use_texture);
    sky.build(lats, longs)?;
    sky.render()?;

    let backend = sky.backend();
    for call in &backend.calls {
        match call {
            BackendCall::UploadVertices{id, len} => {
                println!("upload vertices {:?}: {} floats", id, len);
                if vertices {
                    // attribute uploads go out as coords, normals, colours, tex coords
                    if let (Some(data), Some(resolution)) = (backend.vertex_data(*id), sky.resolution()) {
                        print_floats(data, len / resolution.num_vertices());
                    }
                }
            },
            BackendCall::UploadIndices{id, len} => {
                println!("upload indices {:?}: {} indices", id, len);
                if vertices {
                    if let Some(data) = backend.index_data(*id) {
                        println!("  {:?}", data);
                    }
                }
            },
            BackendCall::Draw(draw) => {
                println!("draw {:?} count {} offset {}", draw.primitive, draw.count, draw.offset);
            },
            other => println!("{:?}", other),
        }
    }
    if let Some(resolution) = sky.resolution() {
        log::info!("{}x{}: {} vertices, {} indices, {} draw calls"
                   , lats, longs, resolution.num_vertices(), resolution.num_indices(), backend.draws().len());
    }
    Ok(())
}

fn main() {
    let matches = cli().get_matches();
    let lats = matches.get_one::<u32>("lats").copied().unwrap_or(4);
    let longs = matches.get_one::<u32>("longs").copied().unwrap_or(5);
    let use_texture = !matches.get_flag("no-texture");
    let vertices = matches.get_flag("vertices");

    init_logger(matches.get_flag("debug"));

    if let Err(e) = dump(lats, longs, use_texture, vertices) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
