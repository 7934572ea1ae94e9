use crate::error::Result;
use crate::grid::GridBuffers;
use crate::integrator::WaveIntegrator;
use crate::params::EngineParams;
use crate::refraction::RefractionRenderer;

/// One simulated image: the buffers plus the parameters that drive them.
///
/// A session lives until a new source image replaces it. `iterate()` is the
/// per-frame entry point; force written through [`RippleSim::buffers_mut`]
/// between calls is picked up by the next one.
#[derive(Clone, Debug)]
pub struct RippleSim {
    buffers: GridBuffers,
    params: EngineParams,
    integrator: WaveIntegrator,
    renderer: RefractionRenderer,
    frames: u64,
}

impl RippleSim {
    pub fn new(width: usize, height: usize, pixels: &[u32], params: EngineParams) -> Result<Self> {
        params.validate()?;
        let buffers = GridBuffers::new(width, height, pixels)?;
        log::debug!("ripple session {width}x{height} with {params:?}");
        Ok(Self {
            buffers,
            params,
            integrator: WaveIntegrator::new(params),
            renderer: RefractionRenderer::new(params.gamma_shift, params.parallel),
            frames: 0,
        })
    }

    /// Damped-wave sub-steps followed by one refraction pass.
    pub fn iterate(&mut self) {
        self.integrator.advance(&mut self.buffers);
        self.renderer.render(&mut self.buffers);
        self.frames += 1;
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn set_params(&mut self, params: EngineParams) -> Result<()> {
        params.validate()?;
        log::debug!("engine params now {params:?}");
        self.params = params;
        self.integrator = WaveIntegrator::new(params);
        self.renderer = RefractionRenderer::new(params.gamma_shift, params.parallel);
        Ok(())
    }

    pub fn buffers(&self) -> &GridBuffers {
        &self.buffers
    }

    pub fn buffers_mut(&mut self) -> &mut GridBuffers {
        &mut self.buffers
    }

    pub fn width(&self) -> usize {
        self.buffers.width()
    }

    pub fn height(&self) -> usize {
        self.buffers.height()
    }

    pub fn display(&self) -> &[u32] {
        self.buffers.display()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn calm(&mut self) {
        self.buffers.calm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::fixed::in_range;

    fn sim(w: usize, h: usize) -> RippleSim {
        let px: Vec<u32> = (0..(w * h) as u32).collect();
        RippleSim::new(w, h, &px, EngineParams::default()).unwrap()
    }

    #[test]
    fn rejects_bad_params_before_allocating() {
        let bad = EngineParams {
            velocity_damping_shift: 40,
            ..EngineParams::default()
        };
        let err = RippleSim::new(2, 2, &[0; 4], bad).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParams(_)));
    }

    #[test]
    fn untouched_surface_renders_master() {
        let mut s = sim(6, 4);
        for _ in 0..5 {
            s.iterate();
        }
        assert_eq!(s.display(), s.buffers().master());
        assert_eq!(s.frames(), 5);
    }

    #[test]
    fn injected_force_spreads_and_stays_bounded() {
        let mut s = sim(21, 21);
        let grid = s.buffers().grid();
        s.buffers_mut().force_mut()[grid.idx(10, 10)] = 0x4000_0000;
        for _ in 0..30 {
            s.iterate();
            let b = s.buffers();
            assert!(b.heights().current().iter().all(|&v| in_range(v)));
            assert!(b.velocity().iter().all(|&v| in_range(v)));
            assert!(b.force().iter().all(|&v| in_range(v)));
        }
        // The disturbance reached a neighbour several cells away.
        assert_ne!(s.buffers().heights().current()[grid.idx(14, 10)], 0);
    }

    #[test]
    fn set_params_validates() {
        let mut s = sim(4, 4);
        let bad = EngineParams {
            substeps: 0,
            ..EngineParams::default()
        };
        assert!(s.set_params(bad).is_err());
        assert_eq!(s.params().substeps, 4);

        let two = EngineParams {
            substeps: 2,
            ..EngineParams::default()
        };
        s.set_params(two).unwrap();
        assert_eq!(s.params().substeps, 2);
    }

    #[test]
    fn calm_restores_master() {
        let mut s = sim(9, 9);
        let grid = s.buffers().grid();
        s.buffers_mut().force_mut()[grid.idx(4, 4)] = 0x100_0000;
        s.iterate();
        s.calm();
        assert_eq!(s.display(), s.buffers().master());
        assert!(s.buffers().heights().current().iter().all(|&v| v == 0));
    }
}
