use hexglobe::Planet;
use three_d::{
    AmbientLight, Camera, ClearState, ColorMaterial, Context, CpuMaterial, CpuMesh, FrameOutput,
    Gm, Indices, Mesh, OrbitControl, Positions, Srgba, Vec2, Window, WindowSettings, degrees, vec3,
};

fn planet_view(planet: &Planet, context: &Context) -> Gm<Mesh, ColorMaterial> {
    let buffers = planet.buffers();
    let cpumesh = CpuMesh {
        positions: Positions::F32(
            buffers
                .positions()
                .chunks_exact(3)
                .map(|p| vec3(p[0], p[1], p[2]))
                .collect(),
        ),
        colors: Some(
            buffers
                .colors()
                .chunks_exact(3)
                .map(|c| {
                    Srgba::new_opaque(
                        (c[0] * 255.0) as u8,
                        (c[1] * 255.0) as u8,
                        (c[2] * 255.0) as u8,
                    )
                })
                .collect(),
        ),
        uvs: Some(
            buffers
                .uvs()
                .chunks_exact(2)
                .map(|uv| Vec2::new(uv[0], uv[1]))
                .collect(),
        ),
        indices: Indices::U32(buffers.indices().to_vec()),
        ..Default::default()
    };
    let material = ColorMaterial::new_opaque(
        context,
        &CpuMaterial {
            albedo: Srgba::WHITE,
            ..Default::default()
        },
    );
    Gm::new(Mesh::new(context, &cpumesh), material)
}

fn transformation(m: glam::Mat4) -> three_d::Mat4 {
    let c = m.to_cols_array();
    three_d::Mat4::new(
        c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7], c[8], c[9], c[10], c[11], c[12], c[13],
        c[14], c[15],
    )
}

fn main() {
    env_logger::init();
    // Window and context.
    let window = Window::new(WindowSettings {
        title: "Planet".to_string(),
        min_size: (512, 256),
        ..Default::default()
    })
    .unwrap();
    let context = window.gl();
    // Setup the camera and the controls and lights.
    let mut camera = Camera::new_perspective(
        window.viewport(),
        vec3(0.0, 1.5, 4.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(45.0),
        0.1,
        1000.0,
    );
    let mut control = OrbitControl::new(*camera.target(), 1.5, 100.0);
    let ambient = AmbientLight::new(&context, 0.7, Srgba::WHITE);
    // Build the planet and repaint its polar caps.
    let mut planet = Planet::new(4).expect("Cannot build planet");
    planet.paint_poles(glam::vec3(0.92, 0.94, 0.97));
    let mut view = planet_view(&planet, &context);
    // Render loop.
    window.render_loop(move |mut frame_input| {
        camera.set_viewport(frame_input.viewport);
        control.handle_events(&mut camera, &mut frame_input.events);
        planet.update((frame_input.elapsed_time / 1000.0) as f32);
        view.set_transformation(transformation(planet.model_transform()));
        frame_input
            .screen()
            .clear(ClearState::color_and_depth(0.02, 0.02, 0.05, 1.0, 1.0))
            .render(&camera, view.into_iter(), &[&ambient]);
        FrameOutput::default()
    });
}
