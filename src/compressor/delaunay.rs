//! 실측 성능 격자용 2차원 Delaunay 삼각분할과 무게중심 선형 보간.
//!
//! Bowyer-Watson 점진 삽입으로 삼각형을 만들고, 볼록 껍질 판정은 단조 사슬(monotone chain)로
//! 따로 계산한다. 격자가 고정이므로 분할은 모델 생성 시 한 번만 수행한다.

use std::collections::HashMap;

/// 평면 위의 점. 압축기 격자에서는 x = 증발온도, y = 응축온도.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 경계 판정 허용오차
const EPS: f64 = 1e-9;

fn cross(o: Point2, a: Point2, b: Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// 외접원 정보를 캐시한 삼각형.
struct BwTri {
    v: [usize; 3],
    center: Point2,
    radius_sq: f64,
}

/// 정렬된 꼭짓점 쌍으로 만든 변 키.
#[derive(Hash, Eq, PartialEq)]
struct EdgeKey([usize; 2]);

impl EdgeKey {
    fn new(a: usize, b: usize) -> Self {
        if a < b {
            EdgeKey([a, b])
        } else {
            EdgeKey([b, a])
        }
    }
}

/// 세 점의 외접원 (중심, 반지름²). 세 점이 한 직선 위에 있으면 `None`.
fn circumcircle(a: Point2, b: Point2, c: Point2) -> Option<(Point2, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.x * a.x + a.y * a.y;
    let b2 = b.x * b.x + b.y * b.y;
    let c2 = c.x * c.x + c.y * c.y;
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point2::new(ux, uy);
    let dx = a.x - ux;
    let dy = a.y - uy;
    Some((center, dx * dx + dy * dy))
}

/// 모든 점을 충분히 여유 있게 감싸는 초삼각형.
fn super_triangle(points: &[Point2]) -> [Point2; 3] {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let cx = (min_x + max_x) * 0.5;
    let cy = (min_y + max_y) * 0.5;
    let span = (max_x - min_x).max(max_y - min_y).max(1e-6);
    // 초삼각형 꼭짓점이 멀수록 껍질 가장자리 삼각형 누락이 줄어든다.
    let scale = 1000.0 * span;
    [
        Point2::new(cx - 2.0 * scale, cy - scale),
        Point2::new(cx + 2.0 * scale, cy - scale),
        Point2::new(cx, cy + 2.0 * scale),
    ]
}

fn all_collinear(points: &[Point2]) -> bool {
    let Some(&a) = points.first() else {
        return true;
    };
    let Some(&b) = points.iter().find(|p| (p.x - a.x).abs() > EPS || (p.y - a.y).abs() > EPS) else {
        return true;
    };
    points.iter().all(|&p| cross(a, b, p).abs() < EPS)
}

/// Bowyer-Watson 점진 삽입 Delaunay 삼각분할.
///
/// 점이 3개 미만이거나 모두 한 직선 위에 있으면 `None`.
/// 반환되는 삼각형은 입력 `points`의 인덱스를 가리킨다.
pub fn bowyer_watson(points: &[Point2]) -> Option<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 || all_collinear(points) {
        return None;
    }

    let super_pts = super_triangle(points);
    let mut all_points: Vec<Point2> = points.to_vec();
    all_points.extend_from_slice(&super_pts);
    let si = [n, n + 1, n + 2];

    let (center, radius_sq) = circumcircle(all_points[si[0]], all_points[si[1]], all_points[si[2]])?;
    let mut tris = vec![BwTri { v: si, center, radius_sq }];

    for i in 0..n {
        let pt = all_points[i];

        // 외접원 위에 놓인 점은 밖으로 본다.
        let mut bad: Vec<usize> = Vec::new();
        for (ti, tri) in tris.iter().enumerate() {
            let dx = tri.center.x - pt.x;
            let dy = tri.center.y - pt.y;
            if dx * dx + dy * dy < tri.radius_sq * (1.0 - 1e-12) {
                bad.push(ti);
            }
        }
        if bad.is_empty() {
            continue;
        }

        let mut edge_count: HashMap<EdgeKey, (usize, [usize; 2])> = HashMap::new();
        for &bi in &bad {
            let v = tris[bi].v;
            for edge in [[v[0], v[1]], [v[1], v[2]], [v[2], v[0]]] {
                edge_count
                    .entry(EdgeKey::new(edge[0], edge[1]))
                    .and_modify(|(count, _)| *count += 1)
                    .or_insert((1, edge));
            }
        }
        let mut boundary: Vec<[usize; 2]> = edge_count
            .into_values()
            .filter(|(count, _)| *count == 1)
            .map(|(_, edge)| edge)
            .collect();
        // HashMap 순회 순서와 무관하게 같은 결과를 내도록 정렬
        boundary.sort_unstable();

        bad.sort_unstable();
        for &bi in bad.iter().rev() {
            tris.swap_remove(bi);
        }

        for edge in &boundary {
            let v = [edge[0], edge[1], i];
            if let Some((center, radius_sq)) = circumcircle(all_points[v[0]], all_points[v[1]], all_points[v[2]]) {
                tris.push(BwTri { v, center, radius_sq });
            }
        }
    }

    tris.retain(|t| t.v.iter().all(|&vi| vi < n));
    let mut result: Vec<[usize; 3]> = tris
        .into_iter()
        .filter(|t| cross(all_points[t.v[0]], all_points[t.v[1]], all_points[t.v[2]]).abs() > 1e-12)
        .map(|t| t.v)
        .collect();
    result.sort_unstable();

    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

/// 삼각형 (a, b, c)에 대한 점 p의 무게중심 좌표.
pub fn barycentric(p: Point2, a: Point2, b: Point2, c: Point2) -> Option<[f64; 3]> {
    let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if det.abs() < 1e-12 {
        return None;
    }
    let l1 = ((b.y - c.y) * (p.x - c.x) + (c.x - b.x) * (p.y - c.y)) / det;
    let l2 = ((c.y - a.y) * (p.x - c.x) + (a.x - c.x) * (p.y - c.y)) / det;
    Some([l1, l2, 1.0 - l1 - l2])
}

/// 반시계 방향 볼록 껍질 꼭짓점을 구한다(단조 사슬).
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    let mut pts: Vec<Point2> = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup_by(|a, b| (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS);
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point2> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// 측정점 삼각분할. 볼록 껍질 판정과 선형 보간을 제공한다.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Point2>,
    triangles: Vec<[usize; 3]>,
    hull: Vec<Point2>,
}

impl Triangulation {
    pub fn new(points: Vec<Point2>) -> Option<Self> {
        let triangles = bowyer_watson(&points)?;
        let hull = convex_hull(&points);
        Some(Self { points, triangles, hull })
    }

    /// 볼록 껍질 안(경계 포함)인지
    pub fn contains(&self, p: Point2) -> bool {
        let h = &self.hull;
        if h.len() < 3 {
            return false;
        }
        (0..h.len()).all(|i| {
            let a = h[i];
            let b = h[(i + 1) % h.len()];
            let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt().max(EPS);
            cross(a, b, p) / len >= -EPS
        })
    }

    /// p가 속한 삼각형의 꼭짓점 인덱스와 가중치.
    ///
    /// 껍질 안이지만 부동소수 오차로 어느 삼각형에도 들지 않으면 가중치가 가장 덜 음수인
    /// 삼각형을 쓴다. 껍질 밖이면 `None`.
    fn locate(&self, p: Point2) -> Option<([usize; 3], [f64; 3])> {
        if !self.contains(p) {
            return None;
        }
        let mut best: Option<(f64, [usize; 3], [f64; 3])> = None;
        for tri in &self.triangles {
            let (a, b, c) = (self.points[tri[0]], self.points[tri[1]], self.points[tri[2]]);
            let Some(w) = barycentric(p, a, b, c) else {
                continue;
            };
            let worst = w[0].min(w[1]).min(w[2]);
            if worst >= -EPS {
                return Some((*tri, w));
            }
            if best.as_ref().map_or(true, |(d, _, _)| worst > *d) {
                best = Some((worst, *tri, w));
            }
        }
        best.map(|(_, tri, w)| (tri, w))
    }

    /// 꼭짓점 값 `values`(점 순서와 동일)를 p에서 선형 보간한다.
    pub fn interpolate(&self, p: Point2, values: &[f64]) -> Option<f64> {
        let (tri, w) = self.locate(p)?;
        let mut sum = 0.0;
        for k in 0..3 {
            sum += w[k] * *values.get(tri[k])?;
        }
        Some(sum)
    }
}
