use crate::{error::Error, mesh::Mesh};

impl Mesh {
    /// Create a tetrahedron centered at the origin, with its vertices lying
    /// on the sphere of the given radius. The smallest closed triangular
    /// manifold, handy as a subdivision scaffold.
    pub fn tetrahedron(radius: f32) -> Result<Self, Error> {
        let mut mesh = Self::with_capacity(4, 6, 4);
        let a = radius * (1.0f32 / 3.0);
        let b = radius * (8.0f32 / 9.0).sqrt();
        let c = radius * (2.0f32 / 9.0).sqrt();
        let d = radius * (2.0f32 / 3.0).sqrt();
        for pos in [
            glam::vec3(0.0, 0.0, radius),
            glam::vec3(-c, d, -a),
            glam::vec3(-c, -d, -a),
            glam::vec3(b, 0.0, -a),
        ] {
            mesh.add_vertex(pos)?;
        }
        mesh.add_tri_face(0.into(), 1.into(), 2.into())?;
        mesh.add_tri_face(0.into(), 2.into(), 3.into())?;
        mesh.add_tri_face(0.into(), 3.into(), 1.into())?;
        mesh.add_tri_face(3.into(), 2.into(), 1.into())?;
        mesh.topol.check_closed()?;
        Ok(mesh)
    }

    /// Create an icosahedron centered at the origin, with its 12 vertices
    /// lying on the sphere of the given radius.
    ///
    /// The coordinates follow from the golden ratio: with `ratio` the edge
    /// length over the diameter, the vertices are signed permutations of
    /// `(0, ±b, ±a)` where `a = (r / ratio) / 2` and
    /// `b = (r / ratio) / (2 * phi)`.
    pub fn icosahedron(radius: f32) -> Result<Self, Error> {
        const IDX: [[u32; 3]; 20] = [
            [2, 1, 0],
            [1, 2, 3],
            [5, 4, 3],
            [4, 8, 3],
            [7, 6, 0],
            [6, 9, 0],
            [11, 10, 4],
            [10, 11, 6],
            [9, 5, 2],
            [5, 9, 11],
            [8, 7, 1],
            [7, 8, 10],
            [2, 5, 3],
            [8, 1, 3],
            [9, 2, 0],
            [1, 7, 0],
            [11, 9, 6],
            [7, 10, 6],
            [5, 11, 4],
            [10, 8, 4],
        ];
        let sqrt5 = 5.0f32.sqrt();
        let phi = (1.0 + sqrt5) * 0.5;
        let ratio = (10.0 + 2.0 * sqrt5).sqrt() / (4.0 * phi);
        let a = (radius / ratio) * 0.5;
        let b = (radius / ratio) / (2.0 * phi);
        let mut mesh = Self::with_capacity(12, 30, 20);
        for pos in [
            glam::vec3(0.0, b, -a),
            glam::vec3(b, a, 0.0),
            glam::vec3(-b, a, 0.0),
            glam::vec3(0.0, b, a),
            glam::vec3(0.0, -b, a),
            glam::vec3(-a, 0.0, b),
            glam::vec3(0.0, -b, -a),
            glam::vec3(a, 0.0, -b),
            glam::vec3(a, 0.0, b),
            glam::vec3(-a, 0.0, -b),
            glam::vec3(b, -a, 0.0),
            glam::vec3(-b, -a, 0.0),
        ] {
            mesh.add_vertex(pos)?;
        }
        for [v0, v1, v2] in IDX {
            mesh.add_tri_face(v0.into(), v1.into(), v2.into())?;
        }
        mesh.topol.check_closed()?;
        Ok(mesh)
    }

    /// Create a flat unit square in the XY plane, made of two triangles.
    ///
    /// This is an open mesh with four boundary edges and one interior edge,
    /// used to exercise the boundary branches of the editing operations.
    pub fn flat_square(size: f32) -> Result<Self, Error> {
        let mut mesh = Self::with_capacity(4, 5, 2);
        for pos in [
            glam::vec3(0.0, 0.0, 0.0),
            glam::vec3(size, 0.0, 0.0),
            glam::vec3(size, size, 0.0),
            glam::vec3(0.0, size, 0.0),
        ] {
            mesh.add_vertex(pos)?;
        }
        mesh.add_tri_face(0.into(), 1.into(), 2.into())?;
        mesh.add_tri_face(0.into(), 2.into(), 3.into())?;
        Ok(mesh)
    }

    /// Create a unit sphere approximation by subdividing an icosahedron the
    /// given number of rounds. Round 0 is the bare icosahedron; every round
    /// quadruples the face count and keeps all vertices on the unit sphere.
    pub fn icosphere(rounds: usize) -> Result<Self, Error> {
        let mut mesh = Self::icosahedron(1.0)?;
        mesh.subdivide(rounds, true)?;
        Ok(mesh)
    }
}

#[cfg(test)]
mod test {
    use crate::{macros::assert_f32_eq, mesh::Mesh};

    #[test]
    fn t_tetrahedron() {
        let tet = Mesh::tetrahedron(1.0).expect("Cannot create a tetrahedron");
        assert_eq!(4, tet.num_vertices());
        assert_eq!(12, tet.num_halfedges());
        assert_eq!(6, tet.num_edges());
        assert_eq!(4, tet.num_faces());
        for v in tet.vertices() {
            assert_f32_eq!(1.0, tet.point(v).expect("Cannot read point").length(), 1e-6);
        }
    }

    #[test]
    fn t_icosahedron() {
        let ico = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
        assert_eq!(12, ico.num_vertices());
        assert_eq!(60, ico.num_halfedges());
        assert_eq!(30, ico.num_edges());
        assert_eq!(20, ico.num_faces());
        for v in ico.vertices() {
            assert_f32_eq!(1.0, ico.point(v).expect("Cannot read point").length(), 1e-6);
            assert_eq!(5, ico.vertex_valence(v));
        }
        for f in ico.faces() {
            assert_eq!(3, ico.face_valence(f));
        }
    }

    #[test]
    fn t_icosahedron_analytic_coordinates() {
        // Vertex 0 sits at (0, b, -a) for the golden-ratio derived constants.
        let sqrt5 = 5.0f32.sqrt();
        let phi = (1.0 + sqrt5) * 0.5;
        let ratio = (10.0 + 2.0 * sqrt5).sqrt() / (4.0 * phi);
        let a = (1.0 / ratio) * 0.5;
        let b = (1.0 / ratio) / (2.0 * phi);
        let ico = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
        let p = ico.point(0.into()).expect("Cannot read point");
        assert_f32_eq!(0.0, p.x, 1e-6);
        assert_f32_eq!(b, p.y, 1e-6);
        assert_f32_eq!(-a, p.z, 1e-6);
    }

    #[test]
    fn t_icosahedron_is_closed() {
        let ico = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
        assert!(
            ico.halfedges().all(|h| !ico.topol.is_boundary_halfedge(h)),
            "Not expecting any boundary halfedges"
        );
    }

    #[test]
    fn t_flat_square() {
        let square = Mesh::flat_square(1.0).expect("Cannot create a square");
        assert_eq!(4, square.num_vertices());
        assert_eq!(5, square.num_edges());
        assert_eq!(2, square.num_faces());
        assert_eq!(
            4,
            square
                .edges()
                .filter(|e| square.is_boundary_edge(*e))
                .count()
        );
        for v in square.vertices() {
            assert!(square.is_boundary_vertex(v));
        }
    }

    #[test]
    fn t_icosphere_round_zero() {
        let mesh = Mesh::icosphere(0).expect("Cannot create icosphere");
        assert_eq!(12, mesh.num_vertices());
        assert_eq!(20, mesh.num_faces());
    }
}
