//! Permutations as image tuples.
//!
//! A permutation of `n` elements is the tuple `(σ(0), σ(1), ..., σ(n-1))`;
//! every number in `0..n` occurs exactly once. Functions that take a
//! permutation validate it and fail with `BadPermutation`.

use snafu::ensure;

use crate::error::{BadPermutationSnafu, EmptyBlockSnafu, LengthMismatchSnafu, Result};

/// True if `permutation` contains every number in `0..n` exactly once.
pub fn check_permutation(permutation: &[usize]) -> bool {
    let mut seen = vec![false; permutation.len()];
    for &p in permutation {
        match seen.get_mut(p) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

fn ensure_permutation(permutation: &[usize]) -> Result<()> {
    ensure!(check_permutation(permutation), BadPermutationSnafu { permutation: permutation.to_vec() });
    Ok(())
}

pub fn invert_permutation(permutation: &[usize]) -> Result<Vec<usize>> {
    ensure_permutation(permutation)?;
    let mut inverse = vec![0; permutation.len()];
    for (i, &p) in permutation.iter().enumerate() {
        inverse[p] = i;
    }
    Ok(inverse)
}

/// Decompose into disjoint cycles.
///
/// The decomposition is unique: each cycle starts at its smallest element
/// and cycles are sorted by that element. Fixed points are 1-cycles.
///
/// `(1, 0, 3, 2)` gives `[[0, 1], [2, 3]]`.
pub fn permutation_to_disjoint_cycles(permutation: &[usize]) -> Result<Vec<Vec<usize>>> {
    ensure_permutation(permutation)?;
    let mut visited = vec![false; permutation.len()];
    let mut cycles = Vec::new();
    for start in 0..permutation.len() {
        if visited[start] {
            continue;
        }
        let mut cycle = vec![start];
        visited[start] = true;
        let mut next = permutation[start];
        while next != start {
            visited[next] = true;
            cycle.push(next);
            next = permutation[next];
        }
        cycles.push(cycle);
    }
    Ok(cycles)
}

/// Rebuild an image tuple from disjoint cycles, subtracting `offset` from
/// every element.
pub fn permutation_from_disjoint_cycles(cycles: &[Vec<usize>], offset: usize) -> Result<Vec<usize>> {
    let len: usize = cycles.iter().map(Vec::len).sum();
    let shifted = |p: usize| p.checked_sub(offset).filter(|&q| q < len);

    let bad = || BadPermutationSnafu { permutation: cycles.iter().flatten().copied().collect::<Vec<_>>() }.build();

    let mut image: Vec<usize> = (0..len).collect();
    for cycle in cycles {
        let points = cycle.iter().map(|&p| shifted(p)).collect::<Option<Vec<_>>>().ok_or_else(bad)?;
        for (i, &p) in points.iter().enumerate() {
            image[p] = points[(i + 1) % points.len()];
        }
    }
    ensure_permutation(&image)?;
    Ok(image)
}

/// Split into the finest sequence of permutations acting on consecutive
/// index ranges.
///
/// `(1, 2, 0, 3, 5, 4)` gives `[(1, 2, 0), (0), (1, 0)]`.
pub fn permutation_to_block_permutations(permutation: &[usize]) -> Result<Vec<Vec<usize>>> {
    ensure!(!permutation.is_empty(), BadPermutationSnafu { permutation: Vec::<usize>::new() });
    let cycles = permutation_to_disjoint_cycles(permutation)?;

    let mut blocks = Vec::new();
    let mut current: Vec<Vec<usize>> = Vec::new();
    let mut start = 0;
    let mut end = 0;
    for cycle in cycles {
        let lo = cycle[0];
        let hi = cycle.iter().copied().max().unwrap_or(lo);
        if !current.is_empty() && lo > end {
            blocks.push(permutation_from_disjoint_cycles(&current, start)?);
            current.clear();
        }
        if current.is_empty() {
            start = lo;
            end = hi;
        }
        end = end.max(hi);
        current.push(cycle);
    }
    blocks.push(permutation_from_disjoint_cycles(&current, start)?);
    Ok(blocks)
}

/// Concatenate block permutations: `(1, 2, 0) ⊞ (0, 2, 1)` is `(1, 2, 0, 3, 5, 4)`.
pub fn permutation_from_block_permutations(blocks: &[Vec<usize>]) -> Vec<usize> {
    let mut image = Vec::with_capacity(blocks.iter().map(Vec::len).sum());
    for block in blocks {
        let offset = image.len();
        image.extend(block.iter().map(|p| p + offset));
    }
    image
}

/// `σ(j) = α(β(j))`.
pub fn compose_permutations(alpha: &[usize], beta: &[usize]) -> Result<Vec<usize>> {
    ensure_permutation(alpha)?;
    permute(alpha, beta)
}

pub fn concatenate_permutations(a: &[usize], b: &[usize]) -> Vec<usize> {
    permutation_from_block_permutations(&[a.to_vec(), b.to_vec()])
}

/// `[l_σ(0), l_σ(1), ...]`.
pub fn permute<T: Clone>(sequence: &[T], permutation: &[usize]) -> Result<Vec<T>> {
    ensure!(
        sequence.len() == permutation.len(),
        LengthMismatchSnafu { sequence: sequence.len(), permutation: permutation.len() }
    );
    ensure_permutation(permutation)?;
    Ok(permutation.iter().map(|&p| sequence[p].clone()).collect())
}

/// Extend a permutation of blocks to a permutation of every channel.
///
/// With blocks of sizes `(2, 3)`, the block swap `(1, 0)` becomes
/// `(3, 4, 0, 1, 2)`.
pub fn full_block_perm(block_permutation: &[usize], block_structure: &[usize]) -> Result<Vec<usize>> {
    ensure!(
        block_structure.len() == block_permutation.len(),
        LengthMismatchSnafu { sequence: block_structure.len(), permutation: block_permutation.len() }
    );
    let inverse = invert_permutation(block_permutation)?;

    let mut image = Vec::with_capacity(block_structure.iter().sum());
    for (&target, &size) in block_permutation.iter().zip(block_structure) {
        let offset: usize = inverse[..target].iter().map(|&j| block_structure[j]).sum();
        image.extend(offset..offset + size);
    }
    Ok(image)
}

/// Factor `permutation` into a permutation of blocks and permutations within
/// each block, such that `full_block_perm(block_perm)` composed with the
/// concatenated within-block permutations gives back `permutation`.
pub fn block_perm_and_perms_within_blocks(
    permutation: &[usize],
    block_structure: &[usize],
) -> Result<(Vec<usize>, Vec<Vec<usize>>)> {
    ensure_permutation(permutation)?;
    ensure!(
        block_structure.iter().sum::<usize>() == permutation.len(),
        LengthMismatchSnafu { sequence: block_structure.iter().sum::<usize>(), permutation: permutation.len() }
    );
    if let Some(index) = block_structure.iter().position(|&size| size == 0) {
        return EmptyBlockSnafu { index }.fail();
    }

    let mut images = Vec::with_capacity(block_structure.len());
    let mut offset = 0;
    for &size in block_structure {
        images.push(&permutation[offset..offset + size]);
        offset += size;
    }
    let mins: Vec<usize> = images.iter().map(|image| image.iter().copied().min().unwrap_or(0)).collect();

    let mut block_perm_inv: Vec<usize> = (0..images.len()).collect();
    block_perm_inv.sort_by_key(|&block| mins[block]);
    let block_perm = invert_permutation(&block_perm_inv)?;

    let mut within = Vec::with_capacity(images.len());
    for image in images {
        let mut order: Vec<usize> = (0..image.len()).collect();
        order.sort_by_key(|&i| image[i]);
        within.push(invert_permutation(&order)?);
    }
    Ok((block_perm, within))
}
