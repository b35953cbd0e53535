use crate::geometry::bounds::Bounds3f;
use crate::interaction::SurfaceInteraction;
use crate::shapes::{Shape, SurfaceHit};
use crate::{Float, Point2f, Point3f, Ray};
use std::cmp::Ordering;

/// Split policy for the recursive build. `Sah` is declared as a future
/// extension and currently falls back to `EqualCounts`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    EqualCounts,
    Sah,
}

/// Bounding volume hierarchy over a set of shapes.
///
/// Nodes live in an index-addressed arena: one flat `Vec`, children linked by
/// `u32` indices, built once and immutable afterwards. The same type serves
/// both levels of the two-level hierarchy: the scene holds a
/// `Bvh<Arc<dyn Shape>>` over meshes, and each mesh holds a private
/// `Bvh<Triangle>` over its triangles.
pub struct Bvh<S> {
    shapes: Vec<S>,
    nodes: Vec<BvhNode>,
    root: Option<u32>,
}

#[derive(Debug)]
struct BvhNode {
    bounds: Bounds3f,
    /// Total surface area of the shapes beneath this node.
    area: Float,
    kind: NodeKind,
}

#[derive(Copy, Clone, Debug)]
enum NodeKind {
    Leaf { shape: u32 },
    Interior { children: [u32; 2] },
}

struct PrimInfo {
    shape_idx: u32,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl<S: Shape> Bvh<S> {
    pub fn build(shapes: Vec<S>, split_method: SplitMethod) -> Self {
        if split_method == SplitMethod::Sah {
            tracing::warn!("SAH split is not implemented, falling back to equal counts");
        }

        let mut prim_info: Vec<PrimInfo> = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let bounds = s.world_bound();
                PrimInfo { shape_idx: i as u32, bounds, centroid: bounds.centroid() }
            })
            .collect();

        let mut nodes = Vec::with_capacity(2 * shapes.len());
        let root = if prim_info.is_empty() {
            None
        } else {
            Some(Self::recursive_build(&shapes, &mut prim_info, &mut nodes))
        };

        Self { shapes, nodes, root }
    }

    fn recursive_build(shapes: &[S], prim_info: &mut [PrimInfo], nodes: &mut Vec<BvhNode>) -> u32 {
        match prim_info.len() {
            1 => Self::push_leaf(shapes, &prim_info[0], nodes),
            2 => {
                let left = Self::push_leaf(shapes, &prim_info[0], nodes);
                let right = Self::push_leaf(shapes, &prim_info[1], nodes);
                Self::push_interior(left, right, nodes)
            }
            _ => {
                let centroid_bounds = prim_info
                    .iter()
                    .fold(Bounds3f::empty(), |b, prim| b.union_point(prim.centroid));
                let axis = centroid_bounds.maximum_extent();
                prim_info.sort_unstable_by(|a, b| {
                    a.centroid[axis]
                        .partial_cmp(&b.centroid[axis])
                        .unwrap_or(Ordering::Equal)
                });

                let mid = prim_info.len() / 2;
                let (lower, upper) = prim_info.split_at_mut(mid);
                let left = Self::recursive_build(shapes, lower, nodes);
                let right = Self::recursive_build(shapes, upper, nodes);
                Self::push_interior(left, right, nodes)
            }
        }
    }

    fn push_leaf(shapes: &[S], prim: &PrimInfo, nodes: &mut Vec<BvhNode>) -> u32 {
        nodes.push(BvhNode {
            bounds: prim.bounds,
            area: shapes[prim.shape_idx as usize].area(),
            kind: NodeKind::Leaf { shape: prim.shape_idx },
        });
        (nodes.len() - 1) as u32
    }

    fn push_interior(left: u32, right: u32, nodes: &mut Vec<BvhNode>) -> u32 {
        let bounds = nodes[left as usize].bounds.union(&nodes[right as usize].bounds);
        let area = nodes[left as usize].area + nodes[right as usize].area;
        nodes.push(BvhNode { bounds, area, kind: NodeKind::Interior { children: [left, right] } });
        (nodes.len() - 1) as u32
    }

    /// Nearest intersection along the ray, or `None` on a miss (including the
    /// empty hierarchy).
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        self.root.and_then(|root| self.intersect_node(root, ray))
    }

    fn intersect_node(&self, node_idx: u32, ray: &Ray) -> Option<SurfaceInteraction> {
        let node = &self.nodes[node_idx as usize];
        if !node.bounds.intersect_p(ray) {
            return None;
        }
        match node.kind {
            NodeKind::Leaf { shape } => self.shapes[shape as usize].intersect(ray),
            NodeKind::Interior { children: [left, right] } => {
                // Recurse into both children unconditionally and keep the
                // closer hit; any hit beats none.
                match (self.intersect_node(left, ray), self.intersect_node(right, ray)) {
                    (Some(a), Some(b)) => Some(if a.t <= b.t { a } else { b }),
                    (a, b) => a.or(b),
                }
            }
        }
    }

    pub fn bounds(&self) -> Bounds3f {
        self.root
            .map(|root| self.nodes[root as usize].bounds)
            .unwrap_or_else(Bounds3f::empty)
    }

    /// Total surface area of all contained shapes; 0 for the empty hierarchy.
    pub fn area(&self) -> Float {
        self.root.map(|root| self.nodes[root as usize].area).unwrap_or(0.0)
    }

    pub fn shapes(&self) -> &[S] {
        &self.shapes
    }

    /// Samples a point uniformly over the aggregate surface by descending
    /// into whichever subtree the running area target falls in, then
    /// delegating to the leaf shape's own sampler.
    ///
    /// The returned density is uniform over the whole surface, 1/area(): the
    /// leaf is reached with probability leaf_area/total_area and samples with
    /// density 1/leaf_area.
    pub fn sample(&self, u_select: Float, u: Point2f) -> Option<(SurfaceHit, Float)> {
        let root = self.root?;
        let total_area = self.nodes[root as usize].area;
        if total_area <= 0.0 {
            return None;
        }

        let mut target = (u_select * total_area).min(total_area - total_area * 1e-6);
        let mut idx = root;
        loop {
            match self.nodes[idx as usize].kind {
                NodeKind::Leaf { shape } => {
                    let (hit, _leaf_pdf) = self.shapes[shape as usize].sample(u_select, u);
                    return Some((hit, 1.0 / total_area));
                }
                NodeKind::Interior { children: [left, right] } => {
                    let left_area = self.nodes[left as usize].area;
                    if target < left_area {
                        idx = left;
                    } else {
                        target -= left_area;
                        idx = right;
                    }
                }
            }
        }
    }
}
