use core::marker::PhantomData;
use core::slice;
use std::cell::RefCell;

use tiny_vec::TinyVec;

const MIN_CHUNK: usize = 64;

/// A chunked arena for values of a single type.
///
/// Chunks are `Vec`s that are filled up to their capacity and then
/// frozen. A chunk's buffer never reallocates once handed out from,
/// so references into it stay valid for the arena's whole lifetime.
pub struct TypedArena<'ctx, T> {
    chunks: RefCell<Vec<Vec<T>>>,
    _marker: PhantomData<&'ctx T>,
}

impl<T> Default for TypedArena<'_, T> {
    fn default() -> Self {
        Self {
            chunks: RefCell::new(Vec::new()),
            _marker: PhantomData,
        }
    }
}

impl<'ctx, T> TypedArena<'ctx, T> {
    #[allow(clippy::mut_from_ref)]
    pub fn alloc(&self, value: T) -> &'ctx mut T {
        let mut chunks = self.chunks.borrow_mut();

        if chunks.last().is_none_or(|c| c.len() == c.capacity()) {
            let cap = chunks.last().map_or(MIN_CHUNK, |c| c.capacity() * 2);
            chunks.push(Vec::with_capacity(cap));
        }

        let chunk = chunks.last_mut().unwrap();
        debug_assert!(chunk.len() < chunk.capacity());
        chunk.push(value);

        let ptr = chunk.last_mut().unwrap() as *mut T;
        /* SAFETY: the chunk still has spare capacity, so the push above
           didn't reallocate, and no future push will: once a chunk fills
           up we start a new one. The buffer is only freed when the arena
           itself is dropped, which `'ctx` outlives by construction. */
        unsafe { &mut *ptr }
    }

    /// Allocates all the values of the iterator in one contiguous slice.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_iter<I>(&self, it: I) -> &'ctx mut [T]
    where
        I: IntoIterator<Item = T>,
    {
        /* The TinyVec keeps up to 8 elements on the stack, so counting
           a small iterator doesn't cost a heap allocation. */
        let values: TinyVec<T, 8> = it.into_iter().collect();

        let mut chunk = Vec::with_capacity(values.len());
        chunk.extend(values);

        let ptr = chunk.as_mut_ptr();
        let len = chunk.len();
        self.chunks.borrow_mut().push(chunk);

        /* SAFETY: the slice gets its own dedicated chunk, sized exactly,
           never pushed to again. Same lifetime argument as `alloc`. */
        unsafe { slice::from_raw_parts_mut(ptr, len) }
    }
}
