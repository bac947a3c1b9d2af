use crate::{
    element::{EH, FH, HH, VH},
    topol::Topology,
};

struct OutgoingHalfedgeIter<'a, const CCW: bool> {
    topol: &'a Topology,
    hstart: Option<HH>,
    hcurrent: Option<HH>,
}

impl Iterator for OutgoingHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.topol.prev_halfedge(current).opposite();
                self.hcurrent = match self.hstart {
                    Some(start) if start != next => Some(next),
                    _ => None,
                };
                Some(current)
            }
            None => None,
        }
    }
}

impl Iterator for OutgoingHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.topol.next_halfedge(current.opposite());
                self.hcurrent = match self.hstart {
                    Some(start) if start != next => Some(next),
                    _ => None,
                };
                Some(current)
            }
            None => None,
        }
    }
}

struct LoopHalfedgeIter<'a, const CCW: bool> {
    topol: &'a Topology,
    hstart: HH,
    hcurrent: Option<HH>,
}

impl Iterator for LoopHalfedgeIter<'_, true> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.topol.next_halfedge(current);
                self.hcurrent = if next == self.hstart {
                    None
                } else {
                    Some(next)
                };
                Some(current)
            }
            None => None,
        }
    }
}

impl Iterator for LoopHalfedgeIter<'_, false> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.topol.prev_halfedge(current);
                self.hcurrent = if next == self.hstart {
                    None
                } else {
                    Some(next)
                };
                Some(current)
            }
            None => None,
        }
    }
}

pub(crate) fn voh_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = topol.vertex_halfedge(v);
    OutgoingHalfedgeIter::<true> {
        topol,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn voh_cw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = topol.vertex_halfedge(v);
    OutgoingHalfedgeIter::<false> {
        topol,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn vih_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.opposite())
}

pub(crate) fn vv_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| topol.head_vertex(h))
}

pub(crate) fn ve_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = EH> + use<'_> {
    voh_ccw_iter(topol, v).map(|h| h.edge())
}

pub(crate) fn vf_ccw_iter(topol: &Topology, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_ccw_iter(topol, v).filter_map(|h| topol.halfedge_face(h))
}

pub(crate) fn fh_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    loop_ccw_iter(topol, topol.face_halfedge(f))
}

pub(crate) fn fv_ccw_iter(topol: &Topology, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_ccw_iter(topol, f).map(|h| topol.head_vertex(h))
}

/// Walk a halfedge loop via the next pointers, starting at `h`. Unlike
/// [`fh_ccw_iter`] this also works for boundary loops, which have no face.
pub(crate) fn loop_ccw_iter(topol: &Topology, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<true> {
        topol,
        hstart: h,
        hcurrent: Some(h),
    }
}

pub(crate) fn loop_cw_iter(topol: &Topology, h: HH) -> impl Iterator<Item = HH> + use<'_> {
    LoopHalfedgeIter::<false> {
        topol,
        hstart: h,
        hcurrent: Some(h),
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{Handle, HasTopology},
        iterator::{fv_ccw_iter, loop_cw_iter, ve_ccw_iter, vf_ccw_iter, vv_ccw_iter},
        mesh::Mesh,
    };

    #[test]
    fn t_tetrahedron_vertex_circulators() {
        let tet = Mesh::tetrahedron(1.0).expect("Cannot create a tetrahedron");
        for v in tet.vertices() {
            assert_eq!(3, vv_ccw_iter(tet.topology(), v).count());
            assert_eq!(3, ve_ccw_iter(tet.topology(), v).count());
            assert_eq!(3, vf_ccw_iter(tet.topology(), v).count());
        }
    }

    #[test]
    fn t_tetrahedron_face_loops() {
        let tet = Mesh::tetrahedron(1.0).expect("Cannot create a tetrahedron");
        for f in tet.faces() {
            assert_eq!(3, fv_ccw_iter(tet.topology(), f).count());
            let ccw: Vec<_> = fv_ccw_iter(tet.topology(), f).collect();
            let mut cw: Vec<_> = loop_cw_iter(tet.topology(), f.halfedge(&tet))
                .map(|h| tet.head_vertex(h))
                .collect();
            cw.reverse();
            cw.rotate_right(1);
            assert_eq!(ccw, cw);
        }
    }

    #[test]
    fn t_icosahedron_fans_close() {
        let ico = Mesh::icosahedron(1.0).expect("Cannot create an icosahedron");
        for v in ico.vertices() {
            let fan: Vec<_> = vv_ccw_iter(ico.topology(), v).collect();
            assert_eq!(5, fan.len());
            for w in &fan {
                assert!(
                    ico.find_halfedge(v, *w).is_some(),
                    "Fan vertex {} is not a neighbor of {}",
                    w.index(),
                    v.index()
                );
            }
        }
    }

    #[test]
    fn t_flat_square_boundary_fan() {
        let square = Mesh::flat_square(1.0).expect("Cannot create a square");
        // Corner vertices of the square lie on the boundary; their fans must
        // still terminate and cover all incident edges.
        for v in square.vertices() {
            let valence = ve_ccw_iter(square.topology(), v).count();
            assert!(valence == 2 || valence == 3);
        }
    }
}
