use super::Tile;

/// Centers the filler pieces of a tiled run.
///
/// Tiles whose catalog id is in `center_ids` are removed; the tiles from the
/// center index of the remaining sequence onward shift towards the run end by
/// the total filler length. The result leaves one gap at the middle of the
/// run instead of a small piece at one end, and the run still ends where it
/// ended before.
///
/// A run made only of fillers is returned unchanged: there is nothing to
/// shift around them.
#[must_use]
pub fn center_remainder(tiles: &[Tile], center_ids: &[String]) -> Vec<Tile> {
    let is_filler = |t: &Tile| center_ids.iter().any(|id| *id == t.spec.catalog_id);

    let filler_total: f64 = tiles
        .iter()
        .filter(|t| is_filler(*t))
        .map(|t| t.spec.len_f64())
        .sum();
    let kept_count = tiles.iter().filter(|t| !is_filler(*t)).count();
    if filler_total <= 0.0 || kept_count == 0 {
        return tiles.to_vec();
    }

    let center = kept_count / 2;
    let mut out = Vec::with_capacity(kept_count);
    let mut fillers_before = 0.0;
    for t in tiles {
        if is_filler(t) {
            fillers_before += t.spec.len_f64();
            continue;
        }
        let mut moved = t.clone();
        moved.position_along_run -= fillers_before;
        if out.len() >= center {
            moved.position_along_run += filler_total;
        }
        out.push(moved);
    }
    out
}
