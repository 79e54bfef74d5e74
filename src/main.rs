use std::path::{Path, PathBuf};

use glutin::event::{Event, WindowEvent, ElementState};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::WindowBuilder;
use glutin::{Api, ContextBuilder, GlProfile, GlRequest};
use glutin::event::KeyboardInput as KI;
use glutin::event::VirtualKeyCode as VKC;

use clap::{Arg, ArgAction, Command};

use gl46::*;

use cgmath::{Matrix4, SquareMatrix};

use skysphere::error::SkyResult;
use skysphere::model::{MIN_LATS, MIN_LONGS};
use skysphere::sky::Sky;
use skysphere::view::{Camera, Screen, sky_mvp};

use skysphere::opengl::backend::GlSkyBackend;
use skysphere::opengl::gl::{GlCtx, new_gl_ctx};
use skysphere::opengl::program::GlProgram;
use skysphere::opengl::texture::GlTexture;
use skysphere::opengl::uniform::{GlUniform1, GlUniform1Cell};

/******************************************************************************/

const SHADER_VERT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sky.vert");
const SHADER_FRAG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/sky.frag");

struct SkyUniforms {
    mvp: GlUniform1Cell<Matrix4<f32>>,
    use_texture: GlUniform1Cell<i32>,
}

struct Scene {
    sky: Sky<GlSkyBackend>,
    program: GlProgram,
    texture: Option<GlTexture>,
    uniforms: SkyUniforms,
    lats: u32,
    longs: u32,
}

impl Scene {
    fn new(gl: &GlCtx, app_config: &AppConfig) -> SkyResult<Self> {
        let uniforms = SkyUniforms {
            mvp: GlUniform1::new_rc(Matrix4::<f32>::identity()),
            use_texture: GlUniform1::new_rc(0),
        };

        let mut program = GlProgram::from_files(gl, Path::new(SHADER_VERT), Path::new(SHADER_FRAG))?;
        program.set_uniform(0, uniforms.mvp.clone());
        program.set_uniform(1, uniforms.use_texture.clone());
        match program.get_info() {
            Ok(info) => log::debug!("Program info {}", info),
            Err(e) => log::debug!("No program info: {}", e),
        }

        let texture = match &app_config.texture {
            Some(path) => Some(GlTexture::from_image(gl, 0, path)?),
            None => None,
        };
        uniforms.use_texture.borrow_mut().set(texture.is_some() as i32);

        let mut sky = Sky::new(GlSkyBackend::new(gl)?, texture.is_some());
        sky.build(app_config.lats, app_config.longs)?;
        log::info!("Sky {}x{} ready, texture {}", app_config.lats, app_config.longs, sky.use_texture());

        Ok(Scene{sky, program, texture, uniforms, lats: app_config.lats, longs: app_config.longs})
    }

    fn rebuild(&mut self, lats: u32, longs: u32) {
        match self.sky.build(lats, longs) {
            Ok(()) => {
                self.lats = lats;
                self.longs = longs;
                log::info!("Sky rebuilt {}x{}", lats, longs);
            },
            Err(e) => {
                log::warn!("Cannot rebuild sky {}x{}: {}", lats, longs, e);
                if self.sky.resolution().is_none() {
                    if let Err(e) = self.sky.build(self.lats, self.longs) {
                        log::error!("Cannot restore sky {}x{}: {}", self.lats, self.longs, e);
                    }
                }
            },
        }
    }
}

fn render(gl: &GlCtx, scene: &mut Scene) {
    unsafe {
        gl.ClearColor(0.0, 0.0, 0.0, 0.0);
        gl.Clear(GL_COLOR_BUFFER_BIT|GL_DEPTH_BUFFER_BIT);
        gl.Disable(GL_DEPTH_TEST);
    }
    scene.program.use_program();
    if let Some(texture) = &scene.texture {
        texture.bind();
    }
    if let Err(e) = scene.sky.render() {
        log::error!("Sky render failed: {}", e);
    }
}

struct AppConfig {
    lats: u32,
    longs: u32,
    texture: Option<PathBuf>,
    debug: bool,
}

fn cli() -> Command {
    let args = [
        Arg::new("lats")
            .long("lats")
            .action(ArgAction::Set)
            .value_name("LATS")
            .value_parser(clap::value_parser!(u32).range(MIN_LATS as i64..))
            .default_value("40")
            .help("Number of latitude bands"),
        Arg::new("longs")
            .long("longs")
            .action(ArgAction::Set)
            .value_name("LONGS")
            .value_parser(clap::value_parser!(u32).range(MIN_LONGS as i64..))
            .default_value("40")
            .help("Number of longitude divisions"),
        Arg::new("texture")
            .long("texture")
            .action(ArgAction::Set)
            .value_name("IMAGE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Equirectangular sky image, enables texturing"),
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Enable debug printing"),
    ];
    Command::new("skysphere")
        .about("Sky sphere opengl viewer")
        .args(&args)
}

fn get_config() -> AppConfig {
    let matches = cli().get_matches();

    let lats = matches.get_one::<u32>("lats").copied().unwrap_or(40);
    let longs = matches.get_one::<u32>("longs").copied().unwrap_or(40);
    let texture = matches.get_one("texture").cloned();
    let debug = matches.get_flag("debug");

    AppConfig{lats, longs, texture, debug}
}

fn init_logger(app_config: &AppConfig) {
    let log_level: &str = if app_config.debug {
        "debug"
    } else {
        "info"
    };
    let env = env_logger::Env::default()
        .filter_or("SKY_LOG_LEVEL", log_level)
        .write_style_or("SKY_LOG_STYLE", "always");
    env_logger::init_from_env(env);
}

fn main() {
    let app_config = get_config();

    init_logger(&app_config);

    let el = EventLoop::new();
    let wb = WindowBuilder::new().with_title("Sky sphere");

    let windowed_context = match ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (4, 6)))
        .with_gl_profile(GlProfile::Core)
        .build_windowed(wb, &el) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Cannot create GL window: {e}");
            std::process::exit(1);
        }
    };
    let windowed_context = match unsafe { windowed_context.make_current() } {
        Ok(c) => c,
        Err((_, e)) => {
            log::error!("Cannot make GL context current: {e}");
            std::process::exit(1);
        }
    };

    log::debug!("Pixel format of the window's GL context: {:?}", windowed_context.get_pixel_format());

    let gl = new_gl_ctx(windowed_context.context());

    let mut scene = match Scene::new(&gl, &app_config) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Cannot create sky scene: {e}");
            std::process::exit(1);
        }
    };

    let mut camera = Camera::new();
    let mut screen = {
        let size = windowed_context.window().inner_size();
        Screen{width: size.width, height: size.height}
    };

    let mut do_render = true;
    el.run(move |event, _, control_flow| {
        log::trace!("{:?}", event);
        *control_flow = ControlFlow::Wait;

        match event {
            Event::LoopDestroyed => (),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::Resized(physical_size) => {
                    screen.width = physical_size.width;
                    screen.height = physical_size.height;
                    windowed_context.resize(physical_size);
                    unsafe {
                        gl.Viewport(0, 0, screen.width as i32, screen.height as i32);
                    }
                    do_render = true;
                },
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::KeyboardInput { input, .. } => match input {
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Q), .. } => {
                        *control_flow = ControlFlow::Exit
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::R), .. } => {
                        camera.reset();
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Up), .. } => {
                        camera.angle_x += 5;
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Down), .. } => {
                        camera.angle_x -= 5;
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Left), .. } => {
                        camera.angle_z += 5;
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Right), .. } => {
                        camera.angle_z -= 5;
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Equals), .. } => {
                        scene.rebuild(scene.lats + 1, scene.longs + 1);
                        do_render = true;
                    },
                    KI { state: ElementState::Pressed, virtual_keycode: Some(VKC::Minus), .. } => {
                        let lats = scene.lats.saturating_sub(1).max(MIN_LATS);
                        let longs = scene.longs.saturating_sub(1).max(MIN_LONGS);
                        scene.rebuild(lats, longs);
                        do_render = true;
                    },
                    _ => (),
                },
                _ => (),
            },
            Event::RedrawRequested(_) => {
                do_render = true;
            }
            _ => (),
        }
        if do_render {
            scene.uniforms.mvp.borrow_mut().set(sky_mvp(&screen, &camera));
            render(&gl, &mut scene);
            if let Err(e) = windowed_context.swap_buffers() {
                log::error!("Swap buffers failed: {e}");
            }
            do_render = false;
        }
    });
}
